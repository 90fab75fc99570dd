//! CSS for the popup.

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --red: #dc322f;
    --blue: #268bd2;
    --cyan: #2aa198;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --code-bg: var(--base2);
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.popup {
    width: 420px;
    min-height: 320px;
    margin: 0 auto;
    padding: 1rem;
}

.popup h1 { font-size: 1.2rem; font-weight: 600; margin-bottom: 0.75rem; color: var(--base01); }

.view[hidden] { display: none; }

textarea#input-text {
    width: 100%;
    min-height: 160px;
    padding: 0.5rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-family: inherit;
    font-size: 0.9rem;
    resize: vertical;
}

.actions {
    display: flex;
    gap: 0.5rem;
    margin-top: 0.5rem;
}

.actions button, .notes-toolbar button {
    padding: 0.4rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--accent);
    color: var(--fg);
    cursor: pointer;
    font-size: 0.9rem;
}
.actions button.primary { background: var(--blue); color: var(--base3); border-color: var(--blue); }
.actions button:hover, .notes-toolbar button:hover { border-color: var(--link-hover); }

.error {
    margin-top: 0.5rem;
    color: var(--red);
    font-size: 0.85rem;
}
.error:empty { display: none; }

.loading {
    display: flex;
    align-items: center;
    gap: 0.75rem;
    padding: 2rem 0;
    color: var(--muted);
}

.spinner {
    width: 20px;
    height: 20px;
    border: 2px solid var(--border);
    border-top-color: var(--blue);
    border-radius: 50%;
    animation: spin 0.8s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }

.notes-toolbar { display: flex; justify-content: flex-end; margin-bottom: 0.5rem; }

.tab-strip {
    display: flex;
    flex-direction: column;
    gap: 0.25rem;
    border-bottom: 1px solid var(--border);
    padding-bottom: 0.5rem;
    margin-bottom: 0.75rem;
}

.tab-group { display: flex; flex-wrap: wrap; align-items: center; gap: 0.25rem; }
.tab-stamp { font-size: 0.75rem; color: var(--muted); margin-right: 0.25rem; }

.tab {
    display: inline-flex;
    align-items: center;
    gap: 0.25rem;
    padding: 0.15rem 0.5rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    cursor: pointer;
    font-size: 0.85rem;
}
.tab.active { background: var(--accent); color: var(--base01); border-color: var(--base1); }
.tab-title { outline: none; }
.tab-title:focus { border-bottom: 1px dashed var(--blue); }

.tab-delete {
    background: none;
    border: none;
    color: var(--muted);
    cursor: pointer;
    font-size: 1rem;
    line-height: 1;
}
.tab-delete:hover { color: var(--red); }

.pane { display: none; }
.pane.active { display: block; }
.pane-title { font-size: 1rem; font-weight: 600; margin-bottom: 0.5rem; color: var(--base01); }
.pane-body { font-size: 0.9rem; }
.pane-body ul, .pane-body ol { padding-left: 1.25rem; }
.pane-body p { margin-bottom: 0.5rem; }
.pane-body code { background: var(--code-bg); padding: 0 0.2rem; border-radius: 3px; }
"#;
