use quizscan_core::{CHOICE_COUNT, Question, QuestionDraft};

/// Enforce the fixed question shape on a list of drafts, preserving order.
///
/// - missing or zero `id` becomes the 1-based position in the list
/// - `choices` is cut to four and padded with empty strings
/// - `correct_answer_index` survives only if it is in `0..4`
/// - `points` survives only if finite
pub fn normalize(drafts: Vec<QuestionDraft>) -> Vec<Question> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(position, draft)| normalize_one(position, draft))
        .collect()
}

/// Order drafts by id (missing ids first, ties keep input order), then
/// normalize. Used when a reviewed question set is saved.
pub fn sort_and_normalize(mut drafts: Vec<QuestionDraft>) -> Vec<Question> {
    drafts.sort_by_key(QuestionDraft::sort_key);
    normalize(drafts)
}

fn normalize_one(position: usize, draft: QuestionDraft) -> Question {
    let fallback_id = u32::try_from(position + 1).unwrap_or(u32::MAX);
    let mut choices = draft.choices.into_iter();

    Question {
        id: draft.id.filter(|&id| id > 0).unwrap_or(fallback_id),
        text: draft.text,
        choices: std::array::from_fn(|_| choices.next().unwrap_or_default()),
        correct_answer_index: draft
            .correct_answer_index
            .and_then(|i| u8::try_from(i).ok())
            .filter(|&i| usize::from(i) < CHOICE_COUNT),
        points: draft.points.filter(|p| p.is_finite()),
        image: draft.image.filter(|s| !s.is_empty()),
    }
}
