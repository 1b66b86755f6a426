use std::fmt;

use serde::{Deserialize, Serialize};

/// The shade of an ability. Ordered from best to worst: a darker shade
/// makes fewer faces count as successes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Shade {
    /// White shade, the rarest and best.
    #[serde(rename = "W", alias = "white")]
    White,
    /// Gray shade.
    #[serde(rename = "G", alias = "gray")]
    Gray,
    /// Black shade, the common case.
    #[default]
    #[serde(rename = "B", alias = "black")]
    Black,
}

impl Shade {
    /// The worse of two shades. Black absorbs everything.
    pub fn worst_of(self, other: Self) -> Self {
        self.max(other)
    }

    /// The worst shade in a collection, or `None` if it is empty.
    pub fn worst<I: IntoIterator<Item = Shade>>(shades: I) -> Option<Self> {
        shades.into_iter().reduce(Self::worst_of)
    }

    /// Parse a shade from its short or long form, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "b" | "black" => Some(Self::Black),
            "g" | "gray" | "grey" => Some(Self::Gray),
            "w" | "white" => Some(Self::White),
            _ => None,
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "W"),
            Self::Gray => write!(f, "G"),
            Self::Black => write!(f, "B"),
        }
    }
}
