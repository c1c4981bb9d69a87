//! End-to-end parsing of realistic exam-sheet text: parse, then normalize.

use quizscan_parsing::{
    ChoiceTier, QuestionDraft, QuestionParser, extract_questions, normalize, parse_questions,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn two_questions_mixed_punctuation() {
    let text = "1) Capital of France? A. Paris B. Lyon C. Nice D. Lille\n2) 2+2? A)3 B)4 C)5 D)6";
    let questions = extract_questions(text);
    assert_eq!(questions.len(), 2);

    assert_eq!(questions[0].id, 1);
    assert_eq!(questions[0].text, "Capital of France?");
    assert_eq!(questions[0].choices, ["Paris", "Lyon", "Nice", "Lille"].map(String::from));

    assert_eq!(questions[1].id, 2);
    assert_eq!(questions[1].text, "2+2?");
    assert_eq!(questions[1].choices, ["3", "4", "5", "6"].map(String::from));
}

#[test]
fn noisy_recognition_output() {
    // Blank lines, indentation and CRLF the way OCR tends to emit them.
    let text = concat!(
        "  GEOGRAPHY QUIZ  \r\n",
        "\r\n",
        "   1. Longest river in the world?\r\n",
        "  A) Nile\r\n",
        "\r\n",
        "  B) Volga\r\n",
        "  C) Yangtze\r\n",
        "  D) Mississippi\r\n",
        "\n\n",
        "2 ) Highest mountain?\n",
        "A . Everest  B . K2  C . Kangchenjunga  D . Lhotse\n",
    );
    let questions = extract_questions(text);
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].text, "Longest river in the world?");
    assert_eq!(
        questions[0].choices,
        ["Nile", "Volga", "Yangtze", "Mississippi"].map(String::from)
    );
    assert_eq!(questions[1].id, 2);
    assert_eq!(questions[1].text, "Highest mountain?");
    assert_eq!(questions[1].choices[0], "Everest");
    assert_eq!(questions[1].choices[1], "K2");
}

#[test]
fn bare_question_normalizes_to_four_empty_slots() {
    let drafts = parse_questions("7) Describe the water cycle.");
    assert_eq!(drafts.len(), 1);
    assert!(drafts[0].choices.is_empty());

    let questions = normalize(drafts);
    assert_eq!(questions[0].choices, ["", "", "", ""].map(String::from));
    assert_eq!(questions[0].text, "Describe the water cycle.");
}

#[test]
fn output_count_matches_header_blocks() {
    let text = concat!(
        "Class 5 - Science\n",
        "Teacher: Ms. Demir\n",
        "1) Water boils at? A) 90 B) 100\n",
        "2) Ice melts at? A) 0 B) 10\n",
        "3) Steam is? | gas | liquid\n",
        "4) Explain evaporation.\n",
    );
    let blocks = QuestionParser::new().parse_blocks(text);
    assert_eq!(blocks.len(), 4);
    let tiers: Vec<ChoiceTier> = blocks.iter().map(|b| b.tier).collect();
    assert_eq!(
        tiers,
        vec![
            ChoiceTier::Labeled,
            ChoiceTier::Labeled,
            ChoiceTier::Pipe,
            ChoiceTier::Bare
        ]
    );
}

#[test]
fn out_of_order_blocks_are_sorted() {
    let text = "10) ten? A) a B) b\n2) two? A) a B) b\n7) seven? | x | y";
    let ids: Vec<u32> = extract_questions(text).iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![2, 7, 10]);
}

#[test]
fn parsing_never_sets_answer_key_or_points() {
    let drafts = parse_questions("1) Q? A) a B) b\n2) R | x | y\n3) S");
    assert!(
        drafts
            .iter()
            .all(|d| d.correct_answer_index.is_none() && d.points.is_none() && d.image.is_none())
    );
}

#[test]
fn normalization_is_idempotent_on_parsed_output() {
    let once = extract_questions("3) c? A) x B) y\n1) a? | p\n2) b?");
    let again = normalize(once.iter().cloned().map(QuestionDraft::from).collect());
    assert_eq!(once, again);
}

#[test]
fn text_without_headers_yields_nothing() {
    assert!(extract_questions("Just a paragraph of text\nwith no numbering at all").is_empty());
    assert!(extract_questions("").is_empty());
}

#[test]
fn choices_are_trimmed() {
    let q = &parse_questions("1) Q?   A)    spaced   B)\tx\t")[0];
    assert_eq!(q.choices, strings(&["spaced", "x"]));
}
