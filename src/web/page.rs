//! Server-rendered HTML page

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::application::render::{DisplayPayload, HistoryView, SafetyNotice};
use crate::domain::mood::{CopingActions, JournalingPrompts};

const STYLE: &str = r#"
body {font-family: Inter, ui-sans-serif, system-ui, sans-serif; background: #f9fafb; color: #1f2937; margin: 0;}
main {max-width: 1100px; margin: auto; padding: 24px; display: grid; grid-template-columns: 2fr 1fr; gap: 24px;}
@media (max-width: 800px) {main {grid-template-columns: 1fr;}}
header {text-align: center; padding: 20px;}
h1.title {color: #0f766e; font-weight: 800; font-size: 2.5rem; margin-bottom: 0.5rem;}
p.subtitle {color: #64748b; font-size: 1.1rem;}
.panel {background: white; border-radius: 12px; padding: 20px; box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1), 0 2px 4px -1px rgba(0,0,0,0.06);}
textarea {width: 100%; box-sizing: border-box; min-height: 110px; padding: 12px; border-radius: 8px; border: 1px solid #d1d5db; font: inherit;}
button {margin-top: 12px; background: #0d9488; color: white; border: 0; border-radius: 8px; padding: 12px 20px; font-size: 1rem; cursor: pointer;}
button:hover {background: #0f766e;}
.error {background: #fffbeb; border: 1px solid #f59e0b; color: #92400e; padding: 12px; border-radius: 8px; margin-top: 16px;}
.risk-alert {background-color: #fef2f2; border: 1px solid #ef4444; padding: 20px; border-radius: 12px; color: #b91c1c; margin-top: 16px;}
.mood {font-size: 1.4rem; font-weight: 700;}
.coach {white-space: pre-wrap; line-height: 1.5;}
.history-card {background: white; padding: 12px; margin-bottom: 10px; border-radius: 8px; border: 1px solid #e5e7eb; box-shadow: 0 1px 2px rgba(0,0,0,0.05);}
.history-container {max-height: 500px; overflow-y: auto; padding-right: 5px;}
.muted {font-size: 0.8em; color: #9ca3af;}
.guidance {display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-top: 16px;}
@media (max-width: 800px) {.guidance {grid-template-columns: 1fr;}}
.action-item {background: #f0fdfa; border-left: 4px solid #14b8a6; padding: 8px 12px; margin-bottom: 8px; border-radius: 4px;}
.journal-box {background: #fefce8; border: 1px solid #fde68a; padding: 12px; border-radius: 8px;}
.summary {font-style: italic; color: #475569;}
.counts span {display: inline-block; margin: 0 8px 6px 0; padding: 2px 8px; border-radius: 999px; color: white; font-size: 0.85em;}
"#;

/// Everything shown on the page
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Text to keep in the input box (after a failed submission)
    pub input: &'a str,
    pub result: Option<&'a DisplayPayload>,
    pub error: Option<&'a str>,
    /// Emergency card shown alongside an error when the input was risky
    pub safety: Option<&'a SafetyNotice>,
    pub history: Option<&'a HistoryView>,
}

/// Render the full page
pub fn render_page(view: &PageView<'_>) -> String {
    let mut body = String::new();

    body.push_str(r#"<section class="panel">"#);
    body.push_str(r#"<form method="post" action="/checkin">"#);
    body.push_str(r#"<label for="text"><strong>How are you feeling right now?</strong></label>"#);
    body.push_str(&format!(
        r#"<textarea id="text" name="text" placeholder="Take a deep breath and share your thoughts...">{}</textarea>"#,
        encode_text(view.input)
    ));
    body.push_str(r#"<button type="submit">Analyze &amp; support me</button></form>"#);

    if let Some(error) = view.error {
        body.push_str(&format!(r#"<div class="error">{}</div>"#, encode_text(error)));
    }
    if let Some(notice) = view.safety {
        body.push_str(&safety_card(notice));
    }
    if let Some(payload) = view.result {
        body.push_str(&result_block(payload));
    }
    body.push_str(r#"<p><a href="/api/export">Download session transcript</a></p>"#);
    body.push_str("</section>");

    body.push_str(r#"<aside class="panel"><h3>Recent entries</h3>"#);
    match view.history {
        Some(history) if !history.entries.is_empty() => body.push_str(&history_block(history)),
        _ => body.push_str(r#"<p class="muted">No entries yet.</p>"#),
    }
    body.push_str(
        r#"<p class="muted">Privacy: text is sent to the Gemini API. History is stored locally.<br><b>Not a substitute for professional medical advice.</b></p>"#,
    );
    body.push_str("</aside>");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>EmotiCare</title>
<style>{STYLE}</style>
</head>
<body>
<header><h1 class="title">🌿 EmotiCare</h1><p class="subtitle">A companion for mood check-ins and gentle coaching.</p></header>
<main>{body}</main>
</body>
</html>
"#
    )
}

fn result_block(payload: &DisplayPayload) -> String {
    let mut out = String::from(r#"<div class="result"><h3>Insights &amp; support</h3>"#);

    let confidence = payload
        .confidence
        .map(|c| format!(" <span class=\"muted\">({}% confidence)</span>", c))
        .unwrap_or_default();
    out.push_str(&format!(
        r#"<p class="mood">Detected mood: <span style="color: {}">{}</span>{}</p>"#,
        encode_double_quoted_attribute(&payload.mood_color),
        encode_text(&payload.mood),
        confidence
    ));

    if let Some(notice) = &payload.safety {
        out.push_str(&safety_card(notice));
    } else {
        if let Some(summary) = &payload.summary {
            out.push_str(&format!(r#"<p class="summary">{}</p>"#, encode_text(summary)));
        }
        out.push_str(&format!(
            r#"<div class="coach">{}</div>"#,
            encode_text(&payload.coaching_text)
        ));
        if payload.actions.is_some() || payload.journaling.is_some() {
            out.push_str(r#"<div class="guidance">"#);
            if let Some(actions) = &payload.actions {
                out.push_str(&actions_block(actions));
            }
            if let Some(journaling) = &payload.journaling {
                out.push_str(&journaling_block(journaling));
            }
            out.push_str("</div>");
        }
    }

    out.push_str("</div>");
    out
}

fn actions_block(actions: &CopingActions) -> String {
    let items: String = actions
        .entries()
        .into_iter()
        .map(|(title, text)| {
            format!(
                r#"<div class="action-item"><b>{}:</b> {}</div>"#,
                title,
                encode_text(text)
            )
        })
        .collect();
    format!(r#"<div><h4>Coping strategy</h4>{items}</div>"#)
}

fn journaling_block(journaling: &JournalingPrompts) -> String {
    let mut out = String::from(r#"<div><h4>Journaling prompts</h4><div class="journal-box">"#);
    if !journaling.themes.is_empty() {
        out.push_str(&format!(
            "<p><b>Themes:</b> {}</p>",
            encode_text(&journaling.themes.join(", "))
        ));
    }
    if !journaling.prompts.is_empty() {
        let prompts: String = journaling
            .prompts
            .iter()
            .map(|p| format!("<li>{}</li>", encode_text(p)))
            .collect();
        out.push_str(&format!("<p><b>Reflect on this:</b></p><ol>{prompts}</ol>"));
    }
    out.push_str("</div></div>");
    out
}

fn safety_card(notice: &SafetyNotice) -> String {
    let resources: String = notice
        .resources
        .iter()
        .map(|r| {
            format!(
                "<li><b>{}:</b> {}</li>",
                encode_text(&r.region),
                encode_text(&r.contact)
            )
        })
        .collect();

    format!(
        r#"<div class="risk-alert" role="alert"><h3>⚠️ {}</h3><p>{}</p><p>{}</p><ul>{}</ul></div>"#,
        encode_text(&notice.headline),
        encode_text(&notice.lead),
        encode_text(&notice.message),
        resources
    )
}

fn history_block(history: &HistoryView) -> String {
    let counts: String = history
        .mood_counts
        .iter()
        .map(|c| {
            let color = history
                .entries
                .iter()
                .find(|e| e.mood == c.mood)
                .map(|e| e.mood_color.as_str())
                .unwrap_or("#6b7280");
            format!(
                r#"<span style="background: {}">{} {}</span>"#,
                encode_double_quoted_attribute(color),
                encode_text(&c.mood),
                c.count
            )
        })
        .collect();

    let entries: String = history
        .entries
        .iter()
        .map(|e| {
            let risk = if e.risk { " ⚠️" } else { "" };
            let summary = e
                .summary
                .as_deref()
                .map(|s| format!(r#"<div class="summary">{}</div>"#, encode_text(s)))
                .unwrap_or_default();
            format!(
                r#"<div class="history-card"><div class="muted">{}</div><b style="color: {}">{}</b>{}{}<div>{}</div></div>"#,
                encode_text(&e.timestamp),
                encode_double_quoted_attribute(&e.mood_color),
                encode_text(&e.mood),
                risk,
                summary,
                encode_text(&e.excerpt)
            )
        })
        .collect();

    format!(r#"<div class="counts">{counts}</div><div class="history-container">{entries}</div>"#)
}
