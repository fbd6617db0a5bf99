use thiserror::Error;

/// Stable error codes for plan construction failures.
pub mod codes {
    pub const PLAN_DUPLICATE_ENTRY: &str = "PLAN_DUPLICATE_ENTRY";
    pub const PLAN_EMPTY_ENTRY_NAME: &str = "PLAN_EMPTY_ENTRY_NAME";
    pub const PLAN_EMPTY_CHAIN: &str = "PLAN_EMPTY_CHAIN";
    pub const PLAN_INVALID_PATTERN: &str = "PLAN_INVALID_PATTERN";
    pub const PLAN_INVALID_PROXY_PATTERN: &str = "PLAN_INVALID_PROXY_PATTERN";
}

/// Error raised when a build plan cannot be constructed.
///
/// Every variant describes a self-contradictory static table. Nothing here is
/// recoverable: the caller gets either a whole plan or one of these.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("duplicate entry name: {name}")]
    DuplicateEntry { name: String },

    #[error("entry name must not be empty (source: {source_path})")]
    EmptyEntryName { source_path: String },

    #[error("transform rule {index} ({test}) has an empty chain")]
    EmptyChain { index: usize, test: String },

    #[error("invalid file pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("invalid proxy path pattern {pattern:?}: {source}")]
    InvalidProxyPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl PlanError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateEntry { .. } => codes::PLAN_DUPLICATE_ENTRY,
            Self::EmptyEntryName { .. } => codes::PLAN_EMPTY_ENTRY_NAME,
            Self::EmptyChain { .. } => codes::PLAN_EMPTY_CHAIN,
            Self::InvalidPattern { .. } => codes::PLAN_INVALID_PATTERN,
            Self::InvalidProxyPattern { .. } => codes::PLAN_INVALID_PROXY_PATTERN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codes_are_screaming_snake_case() {
        let all = [
            codes::PLAN_DUPLICATE_ENTRY,
            codes::PLAN_EMPTY_ENTRY_NAME,
            codes::PLAN_EMPTY_CHAIN,
            codes::PLAN_INVALID_PATTERN,
            codes::PLAN_INVALID_PROXY_PATTERN,
        ];
        for code in all {
            assert!(
                code.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "Code '{code}' should be SCREAMING_SNAKE_CASE"
            );
        }
    }

    #[test]
    fn test_code_matches_variant() {
        let err = PlanError::DuplicateEntry {
            name: "app".to_string(),
        };
        assert_eq!(err.code(), codes::PLAN_DUPLICATE_ENTRY);
        assert_eq!(err.to_string(), "duplicate entry name: app");
    }
}
