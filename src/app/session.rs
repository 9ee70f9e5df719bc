//! Explicit per-session configuration handed to the catalog at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_dark() { "dark" } else { "light" })
    }
}

/// Who is signed in and how they want things rendered.
///
/// Authentication happens elsewhere; only the resulting token is carried here.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub session_token: Option<String>,
    pub theme: Theme,
}

impl SessionConfig {
    pub fn new(session_token: Option<String>, theme: Theme) -> Self {
        Self {
            session_token,
            theme,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// Keeps the token out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("theme", &self.theme)
            .finish()
    }
}
