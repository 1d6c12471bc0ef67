use snafu::Snafu;
use tracing::{error, info};

use crate::theme::Color;

/// Element id of the rendered tree; the capture target of "Copy Image".
pub const TREE_CONTAINER_ID: &str = "tree";

/// What to rasterise: the element to capture and the color painted behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub element_id: String,
    pub background: Color,
}

impl CaptureRequest {
    pub fn tree(background: &Color) -> Self {
        Self {
            element_id: TREE_CONTAINER_ID.to_string(),
            background: background.clone(),
        }
    }
}

/// Host capability turning a rendered element into PNG bytes.
pub trait NodeCapture {
    fn capture(&self, request: &CaptureRequest) -> Result<Vec<u8>, ExportError>;
}

/// Host capability placing an image on the system clipboard.
pub trait Clipboard {
    fn write_png(&self, png: &[u8]) -> Result<(), ExportError>;
}

/// State of the "Copy Image" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    Copied,
}

impl CopyState {
    pub fn label(&self) -> &'static str {
        match self {
            CopyState::Idle => "Copy Image",
            CopyState::Copied => "Image Copied",
        }
    }
}

/// Makes a single attempt to copy the tree as an image. Failures are logged
/// and leave the button idle.
pub fn copy_tree_image(
    capture: &impl NodeCapture,
    clipboard: &impl Clipboard,
    request: &CaptureRequest,
) -> CopyState {
    let result = capture
        .capture(request)
        .and_then(|png| clipboard.write_png(&png).map(|()| png.len()));

    match result {
        Ok(bytes) => {
            info!("Copied {} byte image of '{}'", bytes, request.element_id);
            CopyState::Copied
        }
        Err(e) => {
            error!("Failed to copy image of '{}': {}", request.element_id, e);
            CopyState::Idle
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ExportError {
    #[snafu(display("Failed to capture the element: {}", reason))]
    CaptureFailed { reason: String },
    #[snafu(display("Clipboard write was refused: {}", reason))]
    ClipboardDenied { reason: String },
    #[snafu(display("Image export is not supported by this host"))]
    Unsupported,
}
