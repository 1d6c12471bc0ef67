use bincode::{Decode, Encode};

use crate::theme::Theme;

/// Everything a visitor's cookie persists: the raw listing and the theme.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SessionState {
    pub files: String,
    pub theme: Theme,
}

impl SessionState {
    /// State for a first visit: empty listing, the configured default theme.
    pub fn fresh(default_theme: &Theme) -> Self {
        Self {
            files: String::new(),
            theme: default_theme.clone(),
        }
    }
}
