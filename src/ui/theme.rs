//! Process-wide colour theme.
//!
//! One theme is active for the whole session. Read it with [`current`],
//! change it with [`set`] or [`toggle`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Colour theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Theme::Light => 0,
            Theme::Dark => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

static THEME: AtomicU8 = AtomicU8::new(0);

/// The active theme
pub fn current() -> Theme {
    Theme::from_u8(THEME.load(Ordering::Relaxed))
}

/// Make `theme` the active theme
pub fn set(theme: Theme) {
    tracing::debug!("Theme set to {}", theme);
    THEME.store(theme.as_u8(), Ordering::Relaxed);
}

/// Switch between light and dark, returning the new theme
pub fn toggle() -> Theme {
    let next = current().toggled();
    set(next);
    next
}
