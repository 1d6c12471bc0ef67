use bincode::{Decode, Encode};
use derive_more::{Display, From};

/// A CSS color string. Values are never validated; the browser decides
/// whether they apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Encode, Decode)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The three display colors of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub lines: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#15232d".into(),
            foreground: "#cdcdcd".into(),
            lines: "#cdcdcd".into(),
        }
    }
}

impl Theme {
    /// Builds a theme from optional fields, taking anything missing from `fallback`.
    pub fn from_fields(
        background: Option<&str>,
        foreground: Option<&str>,
        lines: Option<&str>,
        fallback: &Theme,
    ) -> Self {
        Self {
            background: background.map_or_else(|| fallback.background.clone(), Color::from),
            foreground: foreground.map_or_else(|| fallback.foreground.clone(), Color::from),
            lines: lines.map_or_else(|| fallback.lines.clone(), Color::from),
        }
    }
}
