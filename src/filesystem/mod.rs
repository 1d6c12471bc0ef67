//! Folder/file tree built from a plain-text path listing.
//!
//! Each line of the listing is a path using forward or backward slashes.
//! Lines are merged into a single tree where a node is either a file (leaf)
//! or a folder holding further nodes.

mod tree;

pub use tree::{PathNode, PathTree};
