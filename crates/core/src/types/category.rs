//! Product categories and the listing category filter.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`] or [`CategoryFilter`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The name does not match any known category.
    #[error("unknown category: {0}")]
    Unknown(String),
}

/// The fixed set of product categories.
///
/// Serialized by display name (`"Smart Home"`), which is also what the
/// bundled catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Audio,
    Computers,
    #[serde(rename = "Smart Home")]
    SmartHome,
    Wearables,
    Photography,
    #[serde(rename = "Home Entertainment")]
    HomeEntertainment,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Audio,
        Self::Computers,
        Self::SmartHome,
        Self::Wearables,
        Self::Photography,
        Self::HomeEntertainment,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Computers => "Computers",
            Self::SmartHome => "Smart Home",
            Self::Wearables => "Wearables",
            Self::Photography => "Photography",
            Self::HomeEntertainment => "Home Entertainment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    /// Accepts the display name, case-insensitively, with or without the
    /// space (`"smart home"`, `"SmartHome"`, `"smart-home"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|category| normalize(category.name()) == wanted)
            .ok_or_else(|| CategoryError::Unknown(s.to_owned()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category selection on the listing page: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Label of the "everything" entry.
    pub const ALL_LABEL: &'static str = "All";

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    /// The filter list shown to shoppers: `All` first, then each category.
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::ALL_LABEL) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
