//! Construction inputs read from the environment.
//!
//! The resolver only ever sees a [`PlanEnv`] snapshot. Reading the process
//! environment and `.env` files happens here, before resolution, so that
//! [`crate::resolve`] itself stays free of I/O.
//!
//! `.env` files are loaded in this order, later files overriding earlier ones:
//! 1. `.env`
//! 2. `.env.local`
//! 3. `.env.[mode]`
//! 4. `.env.[mode].local`
//!
//! Variables already present in the process environment always win.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Variable selecting the build mode.
pub const NODE_ENV: &str = "NODE_ENV";

/// Variable selecting the dev server port.
pub const PORT: &str = "PORT";

/// Dev server port used when `PORT` is unset or unusable.
pub const DEFAULT_PORT: u16 = 8080;

/// Immutable snapshot of the variables a plan is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanEnv {
    vars: BTreeMap<String, String>,
}

/// Outcome of reading `PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSetting {
    /// `PORT` is unset.
    Unset,
    /// `PORT` holds a usable port.
    Valid(u16),
    /// `PORT` is set but is not a port number in `1..=65535`.
    Invalid(String),
}

impl PlanEnv {
    /// Empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Layer `.env` file values under the current process environment.
    ///
    /// # Errors
    /// Returns an error if an existing `.env` file cannot be read.
    pub fn from_process_and_files(root: &Path, mode: &str) -> io::Result<Self> {
        let files = load_env_files(root, mode)?;
        Ok(Self::layered(files, std::env::vars()))
    }

    /// Build an env where every `top` variable overrides `base`.
    pub fn layered<B, T>(base: B, top: T) -> Self
    where
        B: IntoIterator<Item = (String, String)>,
        T: IntoIterator<Item = (String, String)>,
    {
        let mut vars: BTreeMap<String, String> = base.into_iter().collect();
        vars.extend(top);
        Self { vars }
    }

    /// Set a variable, returning the updated env.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Raw `NODE_ENV` value, if any.
    #[must_use]
    pub fn node_env(&self) -> Option<&str> {
        self.get(NODE_ENV)
    }

    /// Interpret `PORT`.
    #[must_use]
    pub fn port(&self) -> PortSetting {
        match self.get(PORT) {
            None => PortSetting::Unset,
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port != 0 => PortSetting::Valid(port),
                _ => PortSetting::Invalid(raw.to_string()),
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(String, String)> for PlanEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Parse a `.env` file's contents into key-value pairs.
///
/// Supports:
/// - `KEY=value`, with inline ` #` comments stripped
/// - `KEY="value"` with `\n`, `\r`, `\t`, `\\` and `\"` escapes
/// - `KEY='value'` taken literally
/// - an optional leading `export `
/// - `#` comment lines and blank lines, which are skipped
#[must_use]
pub fn parse_env_file(content: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let key = key.strip_prefix("export ").unwrap_or(key).trim();
        if key.is_empty() {
            continue;
        }

        let raw_value = raw_value.trim();
        let value = if let Some(rest) = raw_value.strip_prefix('"') {
            unescape_double_quoted(rest)
        } else if let Some(rest) = raw_value.strip_prefix('\'') {
            rest.split_once('\'')
                .map_or(rest, |(inner, _)| inner)
                .to_string()
        } else {
            raw_value
                .split_once(" #")
                .map_or(raw_value, |(v, _)| v.trim_end())
                .to_string()
        };

        vars.insert(key.to_string(), value);
    }

    vars
}

fn unescape_double_quoted(rest: &str) -> String {
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

/// Merge the `.env` files under `root` for `mode`.
///
/// Missing files are skipped. Process variables are not consulted here; see
/// [`PlanEnv::from_process_and_files`].
///
/// # Errors
/// Returns an error if an existing file cannot be read.
pub fn load_env_files(root: &Path, mode: &str) -> io::Result<BTreeMap<String, String>> {
    let files = [
        root.join(".env"),
        root.join(".env.local"),
        root.join(format!(".env.{mode}")),
        root.join(format!(".env.{mode}.local")),
    ];

    let mut vars = BTreeMap::new();
    for file in &files {
        if let Some(content) = bundleplan_util::fs::read_optional_lossy(file)? {
            vars.extend(parse_env_file(&content));
        }
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_basic_and_comments() {
        let env = parse_env_file("# comment\n\nPORT=9000\nNODE_ENV=production # trailing\n");
        assert_eq!(env.get("PORT").unwrap(), "9000");
        assert_eq!(env.get("NODE_ENV").unwrap(), "production");
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_parse_quotes_and_export() {
        let env = parse_env_file("export A=\"x\\ny\"\nB='raw \\n # kept'\nC=\"say \\\"hi\\\"\"");
        assert_eq!(env.get("A").unwrap(), "x\ny");
        assert_eq!(env.get("B").unwrap(), "raw \\n # kept");
        assert_eq!(env.get("C").unwrap(), "say \"hi\"");
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let env = parse_env_file("NOEQUALS\n=value\nOK=1");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("OK").unwrap(), "1");
    }

    #[test]
    fn test_port_setting() {
        assert_eq!(PlanEnv::new().port(), PortSetting::Unset);
        assert_eq!(PlanEnv::new().with(PORT, "9999").port(), PortSetting::Valid(9999));
        assert_eq!(
            PlanEnv::new().with(PORT, "abc").port(),
            PortSetting::Invalid("abc".to_string())
        );
        assert_eq!(
            PlanEnv::new().with(PORT, "0").port(),
            PortSetting::Invalid("0".to_string())
        );
        assert_eq!(
            PlanEnv::new().with(PORT, "70000").port(),
            PortSetting::Invalid("70000".to_string())
        );
    }

    #[test]
    fn test_layered_top_wins() {
        let env = PlanEnv::layered(
            pairs(&[("PORT", "1111"), ("ONLY_FILE", "f")]),
            pairs(&[("PORT", "2222")]),
        );
        assert_eq!(env.get("PORT"), Some("2222"));
        assert_eq!(env.get("ONLY_FILE"), Some("f"));
    }

    #[test]
    fn test_load_env_files_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".env"), "A=base\nB=base\nC=base\n").unwrap();
        std::fs::write(root.join(".env.local"), "B=local\n").unwrap();
        std::fs::write(root.join(".env.production"), "C=prod\n").unwrap();
        std::fs::write(root.join(".env.production.local"), "D=prod-local\n").unwrap();
        std::fs::write(root.join(".env.development"), "C=dev\n").unwrap();

        let vars = load_env_files(root, "production").unwrap();
        assert_eq!(vars.get("A").unwrap(), "base");
        assert_eq!(vars.get("B").unwrap(), "local");
        assert_eq!(vars.get("C").unwrap(), "prod");
        assert_eq!(vars.get("D").unwrap(), "prod-local");
    }

    #[test]
    fn test_load_env_files_none_present() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_files(dir.path(), "development").unwrap().is_empty());
    }
}
