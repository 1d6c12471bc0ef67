use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::export::{CopyState, TREE_CONTAINER_ID};
use crate::filesystem::PathTree;
use crate::icons::IconTable;
use crate::render::TreeView;
use crate::session::SessionState;

pub const RESET_THEME_ACTION: &str = "resetTheme";

const DOM_TO_IMAGE_URL: &str = "https://unpkg.com/dom-to-image-more@3.1.6/dist/dom-to-image-more.min.js";

const STYLESHEET: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; padding: 2rem 1rem 0; font-size: 22px; font-family: system-ui, sans-serif; color: #f3f4f6; background-color: #111827; }
h1 { text-align: center; font-size: 2.25rem; font-weight: 700; color: #5eead4; margin: 0; }
h2 { text-align: center; font-size: 1.5rem; font-weight: 400; margin: 1rem 0 0; }
.toolbar { margin: 3rem 2rem 0; display: flex; align-items: center; justify-content: space-between; }
.pickers { display: flex; align-items: center; gap: 2rem; }
.pickers label { display: inline-flex; align-items: center; }
.pickers input { margin-left: 0.5rem; }
button { padding: 0.5rem 1rem; border: 0; border-radius: 0.25rem; font-size: inherit; color: #f3f4f6; background-color: #374151; cursor: pointer; }
button:hover { background-color: #4b5563; }
.workspace { display: flex; margin: 2rem; gap: 2rem; }
.workspace textarea { flex: 1; min-height: 33vh; padding: 1rem; border-radius: 0.75rem; color: #000; font-size: 18px; }
.workspace .tree { flex: 1; padding: 1rem 2rem; border-radius: 0.75rem; border-style: solid; border-width: 1px; }
.row { display: flex; align-items: center; padding: 0.15rem 0; }
.row.file { padding-bottom: 0; }
.tips { display: flex; flex-direction: column; align-items: center; gap: 0.5rem; font-size: 1.125rem; color: #e5e7eb; }
.tips .headline { font-size: 1.5rem; }
code { padding: 0.25rem 0.5rem; border-radius: 0.25rem; color: #1f2937; background-color: #e5e7eb; }
footer { margin: 2rem 0; display: flex; justify-content: center; gap: 1rem; font-size: 0.875rem; color: #6b7280; }
footer a { color: #e5e7eb; }
"#;

// Any edit posts the form. "Copy Image" rasterises the tree and writes it to
// the clipboard; on failure the button keeps its idle label.
const SCRIPT: &str = r#"
(function () {
  var form = document.getElementById("editor");
  form.addEventListener("change", function (event) {
    if (event.target.name) { form.requestSubmit(); }
  });
  var button = document.getElementById("copy-image");
  button.addEventListener("click", function (event) {
    event.preventDefault();
    if (typeof ClipboardItem === "undefined" || !navigator.clipboard || !navigator.clipboard.write) {
      console.error("Clipboard images are not supported by this browser");
      return;
    }
    var target = document.getElementById(button.dataset.target);
    var blob = domtoimage.toBlob(target, { bgcolor: button.dataset.background });
    navigator.clipboard
      .write([new ClipboardItem({ "image/png": blob })])
      .then(function () { button.lastChild.textContent = button.dataset.copiedLabel; })
      .catch(function (error) { console.error(error); });
  });
})();
"#;

const RESET_ICON_PATH: &str = "M9 15L3 9m0 0l6-6M3 9h12a6 6 0 010 12h-3";
const COPY_ICON_PATH: &str = "M8.25 7.5V6.108c0-1.135.845-2.098 1.976-2.192.373-.03.748-.057 1.123-.08M15.75 18H18a2.25 2.25 0 002.25-2.25V6.108c0-1.135-.845-2.098-1.976-2.192a48.424 48.424 0 00-1.123-.08M15.75 18.75v-1.875a3.375 3.375 0 00-3.375-3.375h-1.5a1.125 1.125 0 01-1.125-1.125v-1.5A3.375 3.375 0 006.375 7.5H5.25m11.9-3.664A2.251 2.251 0 0015 2.25h-1.5a2.251 2.251 0 00-2.15 1.586m5.8 0c.065.21.1.433.1.664v.75h-6V4.5c0-.231.035-.454.1-.664M6.75 7.5H4.875c-.621 0-1.125.504-1.125 1.125v12c0 .621.504 1.125 1.125 1.125h9.75c.621 0 1.125-.504 1.125-1.125V16.5a9 9 0 00-9-9z";

/// Renders the whole page for one session.
pub fn render_page(session: &SessionState, icons: &IconTable) -> Markup {
    let theme = &session.theme;
    let tree = PathTree::parse(&session.files);
    let copy_state = CopyState::default();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { "Boron Files" }
                style { (PreEscaped(STYLESHEET)) }
                script src=(DOM_TO_IMAGE_URL) defer {}
            }
            body {
                div.intro {
                    h1 { "Boron Files" }
                    h2 {
                        "Create and share beautiful images of your file list."
                        br;
                        "Start typing into the text area to get started."
                    }
                }
                form #editor method="post" action="/" {
                    div.toolbar {
                        div.pickers {
                            (color_picker("Background Color", "background", theme.background.as_str()))
                            (color_picker("Text Color", "foreground", theme.foreground.as_str()))
                            (color_picker("Line Color", "lines", theme.lines.as_str()))
                            button type="submit" name="action" value=(RESET_THEME_ACTION) {
                                (icon(RESET_ICON_PATH))
                                span { "Reset Theme" }
                            }
                        }
                        button #copy-image type="button"
                            data-target=(TREE_CONTAINER_ID)
                            data-background=(theme.background.as_str())
                            data-copied-label=(CopyState::Copied.label()) {
                            (icon(COPY_ICON_PATH))
                            span { (copy_state.label()) }
                        }
                    }
                    div.workspace {
                        textarea name="files" spellcheck="false" { (session.files) }
                        div.tree id=(TREE_CONTAINER_ID)
                            style=(format!(
                                "background-color: {0}; border-color: {0}; color: {1}",
                                theme.background, theme.foreground
                            )) {
                            (TreeView::new(icons, theme).render(&tree))
                        }
                    }
                }
                div.tips {
                    div.headline { "💡 To get a file listing:" }
                    div { "macOS: " code { "find [directory] -type f" } }
                    div { "Windows: " code { "dir /b /s [directory]" } }
                }
                footer {
                    div { "Inspired by " a href="https://carbon.now.sh" { "Carbon" } }
                    "|"
                    div { "Made with ❤️ by " a href="https://twitter.com/kiliman" { "Kiliman" } }
                    "|"
                    div { "View Source on " a href="https://github.com/kiliman/boron-files" { "GitHub" } }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

fn color_picker(label: &str, name: &str, value: &str) -> Markup {
    html! {
        label {
            (label)
            input type="color" name=(name) value=(value);
        }
    }
}

fn icon(path: &str) -> Markup {
    html! {
        svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24"
            stroke-width="1.5" stroke="currentColor" width="24" height="24" {
            path stroke-linecap="round" stroke-linejoin="round" d=(path) {}
        }
    }
}
