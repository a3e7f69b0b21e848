use colored::{Color, Colorize};

use crate::config::ThemeConfig;

/// Semantic color roles a rendered fragment can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Header,
    Skipped,
    Success,
    Warning,
    Fail,
    Error,
    Xfailed,
    Xpassed,
    ProgressBar,
    ProgressBarFail,
    ProgressBarBackground,
    Path,
    Name,
    Unknown,
    Rerun,
}

const ROLE_COUNT: usize = 15;

impl Role {
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::Header,
        Role::Skipped,
        Role::Success,
        Role::Warning,
        Role::Fail,
        Role::Error,
        Role::Xfailed,
        Role::Xpassed,
        Role::ProgressBar,
        Role::ProgressBarFail,
        Role::ProgressBarBackground,
        Role::Path,
        Role::Name,
        Role::Unknown,
        Role::Rerun,
    ];

    /// Key of this role in the `[theme]` table.
    pub fn key(self) -> &'static str {
        match self {
            Role::Header => "header",
            Role::Skipped => "skipped",
            Role::Success => "success",
            Role::Warning => "warning",
            Role::Fail => "fail",
            Role::Error => "error",
            Role::Xfailed => "xfailed",
            Role::Xpassed => "xpassed",
            Role::ProgressBar => "progressbar",
            Role::ProgressBarFail => "progressbar_fail",
            Role::ProgressBarBackground => "progressbar_background",
            Role::Path => "path",
            Role::Name => "name",
            Role::Unknown => "unknown",
            Role::Rerun => "rerun",
        }
    }

    fn default_color(self) -> Option<Color> {
        match self {
            Role::Header => Some(Color::Magenta),
            Role::Skipped => Some(Color::Blue),
            Role::Success => Some(Color::Green),
            Role::Warning => Some(Color::Yellow),
            Role::Fail => Some(Color::Red),
            Role::Error => Some(Color::Red),
            Role::Xfailed => Some(Color::Green),
            Role::Xpassed => Some(Color::Red),
            Role::ProgressBar => Some(Color::Green),
            Role::ProgressBarFail => Some(Color::Red),
            Role::ProgressBarBackground => Some(Color::BrightBlack),
            Role::Path => Some(Color::Cyan),
            Role::Name => None,
            Role::Unknown => Some(Color::Blue),
            Role::Rerun => Some(Color::Blue),
        }
    }

    fn configured(self, config: &ThemeConfig) -> Option<&str> {
        let value = match self {
            Role::Header => &config.header,
            Role::Skipped => &config.skipped,
            Role::Success => &config.success,
            Role::Warning => &config.warning,
            Role::Fail => &config.fail,
            Role::Error => &config.error,
            Role::Xfailed => &config.xfailed,
            Role::Xpassed => &config.xpassed,
            Role::ProgressBar => &config.progressbar,
            Role::ProgressBarFail => &config.progressbar_fail,
            Role::ProgressBarBackground => &config.progressbar_background,
            Role::Path => &config.path,
            Role::Name => &config.name,
            Role::Unknown => &config.unknown,
            Role::Rerun => &config.rerun,
        };
        value.as_deref()
    }
}

/// Status glyphs drawn on the per-file lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    pub passed: String,
    pub skipped: String,
    pub failed: String,
    pub failed_not_call: String,
    pub xfailed_skipped: String,
    pub xfailed_failed: String,
    pub unknown: String,
    pub rerun: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            passed: "✓".into(),
            skipped: "s".into(),
            failed: "⨯".into(),
            failed_not_call: "ₓ".into(),
            xfailed_skipped: "x".into(),
            xfailed_failed: "X".into(),
            unknown: "?".into(),
            rerun: "R".into(),
        }
    }
}

/// Which glyph a classified result is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Passed,
    Skipped,
    Failed,
    FailedNotCall,
    XfailedSkipped,
    XfailedFailed,
    Unknown,
    Rerun,
}

/// Resolved palette. Built once per session; lookups only afterwards.
#[derive(Debug, Clone)]
pub struct Theme {
    colors: [Option<Color>; ROLE_COUNT],
    pub symbols: Symbols,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    /// Overlay `[theme]` values on the built-in defaults.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut colors = [None; ROLE_COUNT];
        for (slot, role) in colors.iter_mut().zip(Role::ALL) {
            *slot = resolve_color(role, role.configured(config));
        }

        let defaults = Symbols::default();
        let pick = |configured: &Option<String>, default: String| match configured {
            Some(s) if !s.is_empty() => s.clone(),
            _ => default,
        };
        let symbols = Symbols {
            passed: pick(&config.symbol_passed, defaults.passed),
            skipped: pick(&config.symbol_skipped, defaults.skipped),
            failed: pick(&config.symbol_failed, defaults.failed),
            failed_not_call: pick(&config.symbol_failed_not_call, defaults.failed_not_call),
            xfailed_skipped: pick(&config.symbol_xfailed_skipped, defaults.xfailed_skipped),
            xfailed_failed: pick(&config.symbol_xfailed_failed, defaults.xfailed_failed),
            unknown: pick(&config.symbol_unknown, defaults.unknown),
            rerun: pick(&config.symbol_rerun, defaults.rerun),
        };

        Self { colors, symbols }
    }

    pub fn color(&self, role: Role) -> Option<Color> {
        self.colors[role as usize]
    }

    pub fn symbol(&self, glyph: Glyph) -> &str {
        let s = &self.symbols;
        match glyph {
            Glyph::Passed => &s.passed,
            Glyph::Skipped => &s.skipped,
            Glyph::Failed => &s.failed,
            Glyph::FailedNotCall => &s.failed_not_call,
            Glyph::XfailedSkipped => &s.xfailed_skipped,
            Glyph::XfailedFailed => &s.xfailed_failed,
            Glyph::Unknown => &s.unknown,
            Glyph::Rerun => &s.rerun,
        }
    }

    /// `text` in the color of `role`, or unstyled when the role has none.
    pub fn paint(&self, text: &str, role: Role) -> String {
        paint(text, self.color(role), None)
    }

    /// `(glyph, color)` for a glyph drawn in a role's color.
    pub fn resolve(&self, glyph: Glyph, role: Role) -> (String, Option<Color>) {
        (self.symbol(glyph).to_string(), self.color(role))
    }
}

/// Apply optional foreground and background colors.
pub fn paint(text: &str, fg: Option<Color>, bg: Option<Color>) -> String {
    if text.is_empty() {
        return String::new();
    }
    match (fg, bg) {
        (None, None) => text.to_string(),
        (Some(f), None) => text.color(f).to_string(),
        (None, Some(b)) => text.on_color(b).to_string(),
        (Some(f), Some(b)) => text.color(f).on_color(b).to_string(),
    }
}

fn resolve_color(role: Role, configured: Option<&str>) -> Option<Color> {
    let Some(raw) = configured else {
        return role.default_color();
    };
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || value == "none" {
        return None;
    }
    match parse_color(&value) {
        Some(color) => Some(color),
        None => {
            tracing::warn!(
                "unknown color '{}' for theme.{}, keeping the default",
                raw,
                role.key()
            );
            role.default_color()
        }
    }
}

/// Parse a color name. Accepts the eight basic names, `grey`/`gray`, and
/// `light_`/`bright_` variants.
pub fn parse_color(name: &str) -> Option<Color> {
    let normalized = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    let color = match normalized.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" | "light_grey" | "light_gray" => Color::White,
        "grey" | "gray" | "dark_grey" | "dark_gray" | "bright_black" => Color::BrightBlack,
        "light_red" | "bright_red" => Color::BrightRed,
        "light_green" | "bright_green" => Color::BrightGreen,
        "light_yellow" | "bright_yellow" => Color::BrightYellow,
        "light_blue" | "bright_blue" => Color::BrightBlue,
        "light_magenta" | "bright_magenta" => Color::BrightMagenta,
        "light_cyan" | "bright_cyan" => Color::BrightCyan,
        "bright_white" => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

/// Human-readable name for `sugar theme`.
pub fn color_name(color: Option<Color>) -> String {
    let name = match color {
        None => "none",
        Some(Color::Black) => "black",
        Some(Color::Red) => "red",
        Some(Color::Green) => "green",
        Some(Color::Yellow) => "yellow",
        Some(Color::Blue) => "blue",
        Some(Color::Magenta) => "magenta",
        Some(Color::Cyan) => "cyan",
        Some(Color::White) => "white",
        Some(Color::BrightBlack) => "grey",
        Some(Color::BrightRed) => "bright_red",
        Some(Color::BrightGreen) => "bright_green",
        Some(Color::BrightYellow) => "bright_yellow",
        Some(Color::BrightBlue) => "bright_blue",
        Some(Color::BrightMagenta) => "bright_magenta",
        Some(Color::BrightCyan) => "bright_cyan",
        Some(Color::BrightWhite) => "bright_white",
        Some(_) => "custom",
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.color(Role::Success), Some(Color::Green));
        assert_eq!(theme.color(Role::Name), None);
        assert_eq!(theme.color(Role::ProgressBarBackground), Some(Color::BrightBlack));
        assert_eq!(theme.symbol(Glyph::Passed), "✓");
        assert_eq!(theme.symbol(Glyph::FailedNotCall), "ₓ");
    }

    #[test]
    fn test_blank_and_none_mean_unstyled() {
        let config = ThemeConfig {
            fail: Some(String::new()),
            path: Some("None".into()),
            ..Default::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.color(Role::Fail), None);
        assert_eq!(theme.color(Role::Path), None);
        // absent keys keep the default
        assert_eq!(theme.color(Role::Error), Some(Color::Red));
    }

    #[test]
    fn test_overrides_and_unknown_fallback() {
        let config = ThemeConfig {
            success: Some("Magenta".into()),
            skipped: Some("chartreuse".into()),
            symbol_passed: Some("+".into()),
            symbol_failed: Some(String::new()),
            ..Default::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.color(Role::Success), Some(Color::Magenta));
        assert_eq!(theme.color(Role::Skipped), Some(Color::Blue));
        assert_eq!(theme.symbol(Glyph::Passed), "+");
        assert_eq!(theme.symbol(Glyph::Failed), "⨯");
    }

    #[test]
    fn test_resolve_returns_glyph_and_color() {
        let theme = Theme::default();
        assert_eq!(
            theme.resolve(Glyph::XfailedFailed, Role::Xpassed),
            ("X".to_string(), Some(Color::Red))
        );
    }

    #[test]
    fn test_parse_color_aliases() {
        assert_eq!(parse_color("grey"), Some(Color::BrightBlack));
        assert_eq!(parse_color("light-red"), Some(Color::BrightRed));
        assert_eq!(parse_color("Bright Cyan"), Some(Color::BrightCyan));
        assert_eq!(parse_color("plaid"), None);
    }

    #[test]
    fn test_paint_plain_when_colors_disabled() {
        colored::control::set_override(false);
        let theme = Theme::default();
        assert_eq!(theme.paint("ok", Role::Success), "ok");
        assert_eq!(paint("", Some(Color::Red), None), "");
    }

    #[test]
    fn test_color_name() {
        assert_eq!(color_name(None), "none");
        assert_eq!(color_name(Some(Color::BrightBlack)), "grey");
        assert_eq!(color_name(Some(Color::Green)), "green");
    }
}
