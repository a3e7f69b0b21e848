use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SugarError;

/// Top-level layout of `sugar.toml`. Both tables are optional.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SugarConfig {
    pub theme: ThemeConfig,
    pub sugar: SugarSection,
}

/// `[theme]` overrides. `None` means the key was absent and the built-in
/// default applies; `Some("")` or `Some("none")` on a color means unstyled.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    pub header: Option<String>,
    pub skipped: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub fail: Option<String>,
    pub error: Option<String>,
    pub xfailed: Option<String>,
    pub xpassed: Option<String>,
    pub progressbar: Option<String>,
    pub progressbar_fail: Option<String>,
    pub progressbar_background: Option<String>,
    pub path: Option<String>,
    pub name: Option<String>,
    pub unknown: Option<String>,
    pub rerun: Option<String>,
    pub symbol_passed: Option<String>,
    pub symbol_skipped: Option<String>,
    pub symbol_failed: Option<String>,
    pub symbol_failed_not_call: Option<String>,
    pub symbol_xfailed_skipped: Option<String>,
    pub symbol_xfailed_failed: Option<String>,
    pub symbol_unknown: Option<String>,
    pub symbol_rerun: Option<String>,
}

/// `[sugar]` table.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SugarSection {
    pub progressbar_length: Option<RawBarLength>,
}

/// `progressbar_length` as written in the file: either a bare integer or a
/// string (`"10"`, `"20%"`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawBarLength {
    Columns(u16),
    Text(String),
}

/// Progress bar length setting, resolved against the terminal width on
/// first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLength {
    Columns(usize),
    Percent(usize),
}

impl Default for BarLength {
    fn default() -> Self {
        BarLength::Columns(10)
    }
}

impl BarLength {
    /// Number of bar cells for a terminal `width` columns wide.
    pub fn resolve(self, width: usize) -> usize {
        match self {
            BarLength::Columns(n) => n,
            BarLength::Percent(p) => width * p / 100,
        }
    }
}

impl FromStr for BarLength {
    type Err = SugarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SugarError::InvalidBarLength(s.to_string());
        match trimmed.strip_suffix('%') {
            Some(pct) => {
                let p = pct.trim().parse::<usize>().map_err(|_| invalid())?;
                if p > 100 {
                    return Err(invalid());
                }
                Ok(BarLength::Percent(p))
            }
            None => trimmed
                .parse::<usize>()
                .map(BarLength::Columns)
                .map_err(|_| invalid()),
        }
    }
}

impl TryFrom<&RawBarLength> for BarLength {
    type Error = SugarError;

    fn try_from(raw: &RawBarLength) -> Result<Self, Self::Error> {
        match raw {
            RawBarLength::Columns(n) => Ok(BarLength::Columns(*n as usize)),
            RawBarLength::Text(s) => s.parse(),
        }
    }
}

impl fmt::Display for BarLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarLength::Columns(n) => write!(f, "{n}"),
            BarLength::Percent(p) => write!(f, "{p}%"),
        }
    }
}
