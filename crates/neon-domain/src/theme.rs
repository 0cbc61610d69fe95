//! Theme preference identifiers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Cosmic,
    Forest,
    Ocean,
    Sunset,
    Polar,
}

impl ThemeId {
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Cosmic,
        ThemeId::Forest,
        ThemeId::Ocean,
        ThemeId::Sunset,
        ThemeId::Polar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Cosmic => "cosmic",
            ThemeId::Forest => "forest",
            ThemeId::Ocean => "ocean",
            ThemeId::Sunset => "sunset",
            ThemeId::Polar => "polar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ThemeId::Cosmic => "Cosmic Neon",
            ThemeId::Forest => "Dark Forest",
            ThemeId::Ocean => "Midnight Ocean",
            ThemeId::Sunset => "Sunset Drive",
            ThemeId::Polar => "Polar Light",
        }
    }

    pub fn is_dark(self) -> bool {
        !matches!(self, ThemeId::Polar)
    }

    /// Reads a stored identifier, falling back to the default for unknown values.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme `{}`", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemeId {
    type Err = UnknownTheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        ThemeId::ALL
            .into_iter()
            .find(|theme| theme.as_str() == needle)
            .ok_or_else(|| UnknownTheme(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stored_value_falls_back_to_cosmic() {
        assert_eq!(ThemeId::from_stored("neon-pink"), ThemeId::Cosmic);
        assert_eq!(ThemeId::from_stored(" Ocean "), ThemeId::Ocean);
    }

    #[test]
    fn only_polar_is_light() {
        let light: Vec<_> = ThemeId::ALL.iter().filter(|t| !t.is_dark()).collect();
        assert_eq!(light, vec![&ThemeId::Polar]);
    }
}
