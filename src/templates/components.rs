//! The popup page.
//!
//! All three views are always in the document; only the one matching the
//! controller's state lacks the `hidden` attribute.

use crate::models::ViewResponse;
use crate::render::html_escape;
use crate::view::ViewState;

use super::script::POPUP_JS;
use super::styles::STYLE;

fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {content}
    <script>{POPUP_JS}</script>
</body>
</html>"#,
        title = html_escape(title),
        content = content,
    )
}

pub fn popup_html(snapshot: &ViewResponse) -> String {
    let hidden = |view: ViewState| if snapshot.view == view { "" } else { " hidden" };
    let active_json = snapshot
        .active
        .and_then(|a| serde_json::to_string(&a).ok())
        .unwrap_or_else(|| "null".to_string());

    let content = format!(
        r#"<main class="popup" id="popup" data-active="{active}">
        <h1>Recap</h1>

        <div class="view" id="view-initial"{initial_hidden}>
            <textarea id="input-text" placeholder="Paste the text you want to summarize...">{input}</textarea>
            <div class="actions">
                <button id="btn-generate" class="primary">Generate</button>
                <button id="btn-clear">Clear</button>
            </div>
        </div>

        <div class="view loading" id="view-loading"{loading_hidden}>
            <div class="spinner"></div>
            <span>Summarizing and reflecting...</span>
        </div>

        <div class="view" id="view-notes"{notes_hidden}>
            <div class="notes-toolbar">
                <button id="btn-regenerate" title="Regenerate from the original text">Regenerate</button>
                <button id="btn-new">New note</button>
            </div>
            <nav class="tab-strip" id="tab-strip">{tabs}</nav>
            <div class="content" id="panes">{panes}</div>
        </div>

        <div class="error" id="error">{error}</div>
    </main>"#,
        active = html_escape(&active_json),
        initial_hidden = hidden(ViewState::Initial),
        loading_hidden = hidden(ViewState::Loading),
        notes_hidden = hidden(ViewState::Notes),
        input = html_escape(&snapshot.input),
        tabs = snapshot.tabs_html,
        panes = snapshot.panes_html,
        error = html_escape(snapshot.error.as_deref().unwrap_or("")),
    );

    base_html("Recap", &content)
}
