//! HTML rendering of the page and the directory tree.

mod page;
mod tree_view;

pub use page::{RESET_THEME_ACTION, render_page};
pub use tree_view::TreeView;
