use std::collections::HashMap;

use maud::{Markup, html};

use crate::filesystem::{PathNode, PathTree};
use crate::icons::IconTable;
use crate::theme::Theme;

/// Scale applied to every length in the tree so captured images stay crisp.
const ZOOM: f32 = 2.0;

const INDENT_PX: f32 = 22.0;
const ICON_PX: f32 = 16.0;
const ICON_GAP_PX: f32 = 8.0;
const GUIDE_WIDTH_PX: f32 = 1.0;
const GUIDE_MARGIN_PX: f32 = 8.0;
const GUIDE_PADDING_PX: f32 = 12.0;

/// Renders a [`PathTree`] as nested lists: folders first, then files, each
/// sorted by name, with a dotted guide line on every nested level.
pub struct TreeView<'a> {
    icons: &'a IconTable,
    theme: &'a Theme,
}

impl<'a> TreeView<'a> {
    pub fn new(icons: &'a IconTable, theme: &'a Theme) -> Self {
        Self { icons, theme }
    }

    pub fn render(&self, tree: &PathTree) -> Markup {
        self.render_level(tree.root(), 0)
    }

    fn render_level(&self, children: &HashMap<String, PathNode>, level: usize) -> Markup {
        let (folders, files) = PathNode::partition(children);

        html! {
            ul style=(self.list_style(level)) {
                @for (name, grandchildren) in folders {
                    li {
                        div.row {
                            img src=(self.icons.open_folder_url(name))
                                style=(icon_style(0.0))
                                alt=(name);
                            span { (name) }
                        }
                        (self.render_level(grandchildren, level + 1))
                    }
                }
                @for name in files {
                    li style=(format!("margin-left: {}px", -INDENT_PX * ZOOM)) {
                        div.row.file {
                            img src=(self.icons.file_url(name))
                                style=(icon_style(INDENT_PX * ZOOM))
                                alt=(name);
                            span { (name) }
                        }
                    }
                }
            }
        }
    }

    fn list_style(&self, level: usize) -> String {
        let nested = level > 0;
        let scaled = |px: f32| if nested { px * ZOOM } else { 0.0 };
        format!(
            "list-style-type: none; margin: 0; padding-inline-start: {}px; \
             background-color: {}; border-left-style: dotted; border-left-width: {}px; \
             border-left-color: {}; margin-left: {}px; padding-left: {}px",
            INDENT_PX * ZOOM,
            self.theme.background,
            scaled(GUIDE_WIDTH_PX),
            self.theme.lines,
            scaled(GUIDE_MARGIN_PX),
            scaled(GUIDE_PADDING_PX),
        )
    }
}

fn icon_style(margin_left: f32) -> String {
    format!(
        "width: {size}px; height: {size}px; margin-right: {gap}px; margin-left: {margin_left}px",
        size = ICON_PX * ZOOM,
        gap = ICON_GAP_PX * ZOOM,
    )
}
