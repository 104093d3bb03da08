//! Presentation of a [`GenerationRun`]: an HTML grid for the browser and a
//! colored summary for the terminal. Every slot renders, populated or not.

use crate::models::{GenerationRun, ViewResult, ViewType};
use colored::*;

const FAILURE_TEXT: &str = "Generation Failed";

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_card(result: &ViewResult) -> String {
    let label = result.label.as_str();
    let body = match &result.image_data_uri {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="view-image">"#,
            escape_html(src),
            label
        ),
        None => format!(r#"<div class="view-failed">{}</div>"#, FAILURE_TEXT),
    };

    format!(
        r#"<div class="view-card" data-view="{}">{}<h3>{}</h3></div>"#,
        result.label.slug(),
        body,
        label
    )
}

fn wrap_grid(cards: String) -> String {
    format!(
        r#"<section class="view-grid"><h2>Generated Views</h2><div class="grid">{}</div></section>"#,
        cards
    )
}

pub fn render_grid_html(run: &GenerationRun) -> String {
    wrap_grid(run.iter().map(render_card).collect())
}

/// Placeholder grid shown while a run is in flight.
pub fn render_skeleton_html() -> String {
    wrap_grid(
        ViewType::ALL
            .iter()
            .map(|_| r#"<div class="view-card skeleton"></div>"#)
            .collect(),
    )
}

/// A run-level failure is a single message with no grid.
pub fn render_error_html(message: &str) -> String {
    format!(
        r#"<div class="error"><strong>Error:</strong> {}</div>"#,
        escape_html(message)
    )
}

pub fn summary_table(run: &GenerationRun) -> String {
    let mut lines = Vec::with_capacity(run.len() + 1);
    for result in run {
        let status = match &result.image_data_uri {
            Some(uri) => format!("✅ {} bytes (data URI)", uri.len()).green(),
            None => format!("❌ {}", FAILURE_TEXT).red(),
        };
        lines.push(format!("{} {}", format!("{:<8}", result.label.as_str()).bold(), status));
    }
    lines.push(format!(
        "{} of {} views generated",
        run.succeeded(),
        run.len()
    ));
    lines.join("\n")
}

pub fn index_page() -> &'static str {
    INDEX_HTML
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Six-view generator</title>
<style>
body { background: #111827; color: #e5e7eb; font-family: sans-serif; margin: 2rem; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1.5rem; }
.view-card { background: #1f2937; border-radius: 8px; overflow: hidden; text-align: center; }
.view-image { width: 100%; aspect-ratio: 1; object-fit: cover; }
.view-failed { aspect-ratio: 1; display: flex; align-items: center; justify-content: center; color: #f87171; }
.skeleton { aspect-ratio: 1; animation: pulse 1.5s infinite; }
.error { margin-top: 2rem; padding: 1rem; background: #7f1d1d; border-radius: 8px; }
@keyframes pulse { 50% { opacity: .5; } }
</style>
</head>
<body>
<h1>Six-view generator</h1>
<p>Upload a reference image to generate six photographic views.</p>
<input type="file" id="file" accept="image/*">
<button id="generate" disabled>Generate Views</button>
<div id="result"></div>
<script>
const file = document.getElementById('file');
const button = document.getElementById('generate');
const result = document.getElementById('result');
file.addEventListener('change', () => { button.disabled = !file.files.length; result.innerHTML = ''; });
button.addEventListener('click', async () => {
  button.disabled = true;
  button.textContent = 'Generating...';
  const skeleton = await fetch('/skeleton');
  result.innerHTML = await skeleton.text();
  const response = await fetch('/generate', { method: 'POST', body: file.files[0] });
  result.innerHTML = await response.text();
  button.disabled = false;
  button.textContent = 'Generate Views';
});
</script>
</body>
</html>
"#;
