use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>quizscan</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 3rem auto; color: #222; }
  code { background: #f2f2f2; padding: 0 .25rem; }
  td { padding: .15rem .75rem .15rem 0; }
</style>
</head>
<body>
<h1>quizscan is running</h1>
<p>Question store: <code>{{ questions_path }}</code></p>
<table>
  <tr><td><code>POST /upload-pdf</code></td><td>multipart <code>pdf</code> + <code>class</code></td></tr>
  <tr><td><code>POST /save-questions</code></td><td>save a reviewed question set</td></tr>
  <tr><td><code>GET /questions/{class}</code></td><td>saved questions for a class</td></tr>
  <tr><td><code>POST /grade</code></td><td>score submitted answers</td></tr>
  <tr><td><code>POST /register</code>, <code>POST /login</code></td><td>student accounts</td></tr>
</table>
</body>
</html>
"#;

/// Render the index page, injecting the question store location.
pub fn render_index(questions_path: &str) -> Html<String> {
    let html = INDEX_HTML.replace("{{ questions_path }}", &html_escape(questions_path));
    Html(html)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
