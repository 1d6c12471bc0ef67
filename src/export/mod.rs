//! Copying the rendered tree to the clipboard as an image.
//!
//! Rasterising the page and talking to the clipboard are capabilities of the
//! host (the browser). They are modelled as traits so the copy flow can be
//! driven and tested independently of any particular host.
//!
//! The page served to browsers runs the same flow in its inline script
//! (`render::page`), using `dom-to-image-more` for capture and the async
//! Clipboard API for the write.

mod export;

pub use export::{
    CaptureRequest, Clipboard, CopyState, ExportError, NodeCapture, TREE_CONTAINER_ID,
    copy_tree_image,
};
