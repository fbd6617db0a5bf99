use serde::{Deserialize, Serialize};
use std::fmt;

/// Build profile.
///
/// Chosen once per plan. Only the literal `"production"` selects
/// [`Mode::Production`]; every other value, including an unset or empty one,
/// falls back to [`Mode::Development`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Interpret a raw mode value such as the contents of `NODE_ENV`.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_literal() {
        assert_eq!(Mode::from_env_value(Some("production")), Mode::Production);
    }

    #[test]
    fn test_everything_else_is_development() {
        for raw in [
            None,
            Some(""),
            Some("development"),
            Some("staging"),
            Some("Production"),
            Some(" production"),
        ] {
            assert_eq!(Mode::from_env_value(raw), Mode::Development, "{raw:?}");
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Mode::Production).unwrap(),
            "\"production\""
        );
        let back: Mode = serde_json::from_str("\"development\"").unwrap();
        assert_eq!(back, Mode::Development);
    }
}
