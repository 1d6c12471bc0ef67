//! Icon lookup for tree rows, keyed on file extension or folder name.
//! Icons are served by an external image host and referenced by URL.

mod icon_table;

pub use icon_table::{DEFAULT_ICON_BASE_URL, IconTable};
