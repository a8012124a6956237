// Theme Model
// Appearance preference and its resolution against the system scheme

use serde::{Deserialize, Serialize};

// Symbolic appearance preference as the user selected it.
// `Auto` stays symbolic in storage; it resolves to a concrete scheme
// only at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Auto,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }

    /// Parse a stored value. Anything but the three known tokens is invalid.
    pub fn parse(value: &str) -> Option<ThemeMode> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "auto" => Some(ThemeMode::Auto),
            _ => None,
        }
    }

    /// The fixed toggle cycle: light -> dark -> auto -> light.
    pub fn next(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Auto,
            ThemeMode::Auto => ThemeMode::Light,
        }
    }

    /// Resolve to the concrete scheme, deferring to `system` for `Auto`.
    pub fn resolve(&self, system: ColorScheme) -> ColorScheme {
        match self {
            ThemeMode::Light => ColorScheme::Light,
            ThemeMode::Dark => ColorScheme::Dark,
            ThemeMode::Auto => system,
        }
    }
}

// Concrete scheme actually applied to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    pub fn opposite(&self) -> ColorScheme {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_has_length_three() {
        for start in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto] {
            assert_eq!(start.next().next().next(), start);
        }
    }

    #[test]
    fn test_parse_round_trips_known_tokens() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto] {
            assert_eq!(ThemeMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        assert_eq!(ThemeMode::parse(""), None);
        assert_eq!(ThemeMode::parse("Dark"), None);
        assert_eq!(ThemeMode::parse("solarized"), None);
    }

    #[test]
    fn test_auto_resolves_to_system_scheme() {
        assert_eq!(ThemeMode::Auto.resolve(ColorScheme::Dark), ColorScheme::Dark);
        assert_eq!(ThemeMode::Auto.resolve(ColorScheme::Light), ColorScheme::Light);
        assert_eq!(ThemeMode::Light.resolve(ColorScheme::Dark), ColorScheme::Light);
        assert_eq!(ThemeMode::Dark.resolve(ColorScheme::Light), ColorScheme::Dark);
    }
}
