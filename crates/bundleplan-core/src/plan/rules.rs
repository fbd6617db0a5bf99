//! Per-file transform rules.
//!
//! A [`RuleSet`] is evaluated top to bottom against a file path and the first
//! matching [`TransformRule`] supplies the transform chain for that file.
//! Rules never merge: a later rule whose predicate also matches is ignored.

use crate::error::PlanError;
use regex_lite::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// A compiled regular expression matched against path strings.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self, PlanError> {
        let regex = Regex::new(pattern).map_err(|source| PlanError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for FilePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FilePattern {}

impl Serialize for FilePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for FilePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(de::Error::custom)
    }
}

/// Scope condition for `include` / `exclude`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Matches paths at or below this directory (component-wise prefix).
    ///
    /// Unlike a plain string prefix, `/p/src` does not match `/p/src-old/x.js`.
    Path(PathBuf),
    /// Matches paths whose string form matches the pattern anywhere.
    Pattern(FilePattern),
}

impl Condition {
    pub fn pattern(pattern: &str) -> Result<Self, PlanError> {
        FilePattern::new(pattern).map(Self::Pattern)
    }

    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Path(prefix) => path.starts_with(prefix),
            Self::Pattern(pattern) => pattern.is_match(&path.to_string_lossy()),
        }
    }
}

/// Phase marker passed through to the consumer.
///
/// It does not affect selection in [`RuleSet::select`], which is purely
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforce {
    Pre,
    Post,
}

impl Enforce {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }
}

/// A named external per-file operation and its opaque options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    pub loader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl Transform {
    #[must_use]
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Look up a top-level option.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.as_ref()?.get(key)
    }
}

/// File predicate plus the transform chain applied to matching files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRule {
    pub test: FilePattern,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Enforce>,
    pub chain: Vec<Transform>,
}

impl TransformRule {
    /// Start a rule for files matching `test`, with an empty chain.
    pub fn new(test: &str) -> Result<Self, PlanError> {
        Ok(Self {
            test: FilePattern::new(test)?,
            include: Vec::new(),
            exclude: Vec::new(),
            enforce: None,
            chain: Vec::new(),
        })
    }

    #[must_use]
    pub fn include(mut self, condition: Condition) -> Self {
        self.include.push(condition);
        self
    }

    #[must_use]
    pub fn exclude(mut self, condition: Condition) -> Self {
        self.exclude.push(condition);
        self
    }

    #[must_use]
    pub fn enforce(mut self, enforce: Enforce) -> Self {
        self.enforce = Some(enforce);
        self
    }

    /// Append a transform to the chain.
    #[must_use]
    pub fn then(mut self, transform: Transform) -> Self {
        self.chain.push(transform);
        self
    }

    /// Whether this rule applies to `path`.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if !self.test.is_match(&path.to_string_lossy()) {
            return false;
        }
        if !self.include.is_empty() && !self.include.iter().any(|c| c.matches(path)) {
            return false;
        }
        !self.exclude.iter().any(|c| c.matches(path))
    }

    /// Loader names in chain order.
    pub fn loaders(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(|t| t.loader.as_str())
    }
}

/// Ordered rule list with first-match-wins selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TransformRule>", into = "Vec<TransformRule>")]
pub struct RuleSet {
    rules: Vec<TransformRule>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after every existing one.
    pub fn push(&mut self, rule: TransformRule) -> Result<(), PlanError> {
        if rule.chain.is_empty() {
            return Err(PlanError::EmptyChain {
                index: self.rules.len(),
                test: rule.test.as_str().to_string(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// First rule matching `path`, with its declaration index.
    #[must_use]
    pub fn select(&self, path: &Path) -> Option<(usize, &TransformRule)> {
        self.rules.iter().enumerate().find(|(_, rule)| rule.matches(path))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TransformRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<Vec<TransformRule>> for RuleSet {
    type Error = PlanError;

    fn try_from(rules: Vec<TransformRule>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }
}

impl From<RuleSet> for Vec<TransformRule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}
