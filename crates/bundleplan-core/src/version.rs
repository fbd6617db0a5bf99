use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version string including the build's git hash when one was provided.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("bundleplan {VERSION}");

    if let Some(hash) = option_env!("BUNDLEPLAN_BUILD_GIT_HASH") {
        let _ = write!(s, " ({hash})");
    }

    let _ = write!(s, " [plan schema v{}]", crate::plan::PLAN_SCHEMA_VERSION);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        let vs = version_string();
        assert!(vs.starts_with("bundleplan "));
        assert!(vs.contains(VERSION));
        assert!(vs.ends_with("[plan schema v1]"));
    }
}
