//! Client-side glue for the popup page.
//!
//! The page never builds markup itself: every action calls the JSON API and
//! applies the returned view (visible state, tab strip, panes, error line).
//! Tab switching flips the `active` classes locally first so it feels
//! instant, then records the choice on the server.

pub const POPUP_JS: &str = r#"
const VIEWS = ['initial', 'loading', 'notes'];
let active = null;

function showView(name) {
    for (const v of VIEWS) {
        document.getElementById('view-' + v).hidden = (v !== name);
    }
}

function applyView(data) {
    document.getElementById('tab-strip').innerHTML = data.tabs_html;
    document.getElementById('panes').innerHTML = data.panes_html;
    document.getElementById('error').textContent = data.error || '';
    document.getElementById('input-text').value = data.input || '';
    active = data.active;
    showView(data.view);
}

async function call(method, url, body, apply = true) {
    const options = { method: method, headers: { 'Content-Type': 'application/json' } };
    if (body !== undefined) options.body = JSON.stringify(body);
    try {
        const response = await fetch(url, options);
        if (!response.ok) {
            document.getElementById('error').textContent = await response.text();
            return;
        }
        if (apply) applyView(await response.json());
    } catch (e) {
        document.getElementById('error').textContent = e.message;
    }
}

function generate() {
    const text = document.getElementById('input-text').value;
    if (text.trim().length > 0) showView('loading');
    call('POST', '/api/generate', { text: text });
}

function regenerate() {
    if (!active) return;
    showView('loading');
    call('POST', '/api/note/' + active.note + '/regenerate');
}

function markActive(note, section) {
    document.querySelectorAll('.tab, .pane').forEach(el => {
        const match = el.dataset.note === note && el.dataset.section === section;
        el.classList.toggle('active', match);
    });
}

document.addEventListener('DOMContentLoaded', () => {
    document.getElementById('btn-generate').addEventListener('click', generate);
    document.getElementById('btn-clear').addEventListener('click', () => call('POST', '/api/clear'));
    document.getElementById('btn-new').addEventListener('click', () => call('POST', '/api/new-note'));
    document.getElementById('btn-regenerate').addEventListener('click', regenerate);
    active = JSON.parse(document.getElementById('popup').dataset.active || 'null');

    const strip = document.getElementById('tab-strip');

    strip.addEventListener('click', e => {
        const tab = e.target.closest('.tab');
        if (!tab) return;
        const { note, section } = tab.dataset;
        if (e.target.classList.contains('tab-delete')) {
            if (confirm('Delete this section?')) {
                call('DELETE', '/api/note/' + note + '/section/' + section);
            }
            return;
        }
        markActive(note, section);
        active = { note: Number(note), section: Number(section) };
        call('POST', '/api/tab', { note: Number(note), section: Number(section) }, false);
    });

    strip.addEventListener('keydown', e => {
        if (e.target.classList.contains('tab-title') && e.key === 'Enter') {
            e.preventDefault();
            e.target.blur();
        }
    });

    strip.addEventListener('focusout', e => {
        if (!e.target.classList.contains('tab-title')) return;
        const tab = e.target.closest('.tab');
        call('POST', '/api/note/' + tab.dataset.note + '/section/' + tab.dataset.section + '/title',
             { title: e.target.textContent });
    });
});
"#;
