//! The build plan handed to the external bundler.
//!
//! A [`BuildPlan`] is plain data: it names entries, transforms, passes and
//! server settings but never runs any of them. Plans are produced by
//! [`crate::resolve`] and are not mutated afterwards.

mod entry;
mod passes;
mod rules;
mod server;

pub use entry::{Entry, EntryMap, OutputConfig, NAME_PLACEHOLDER};
pub use passes::{
    CompressOptions, DefinePass, HtmlMinify, HtmlPass, MinifyOutput, MinifyPass, Pass,
    PluginList, NODE_ENV_EXPR,
};
pub use rules::{Condition, Enforce, FilePattern, RuleSet, Transform, TransformRule};
pub use server::{PathGlob, ProxyRoute, ServerConfig};

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Schema version for serialized plans. Bump when changing the format.
pub const PLAN_SCHEMA_VERSION: u32 = 1;

/// Source-map style for emitted bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Devtool {
    /// Separate, full source maps.
    SourceMap,
    /// Fast inline maps with line-level mappings.
    CheapModuleEvalSourceMap,
}

impl Devtool {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceMap => "source-map",
            Self::CheapModuleEvalSourceMap => "cheap-module-eval-source-map",
        }
    }

    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Production => Self::SourceMap,
            Mode::Development => Self::CheapModuleEvalSourceMap,
        }
    }
}

/// Module resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Extensions probed for extensionless imports, in order.
    pub extensions: Vec<String>,
    /// Directories searched for bare specifiers, in order.
    pub modules: Vec<PathBuf>,
    /// Specifier prefix → replacement (path or package name).
    pub alias: BTreeMap<String, String>,
}

/// Which runtime globals the bundler shims for browser output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct NodeShims {
    pub global: bool,
    pub process: bool,
    #[serde(rename = "Buffer")]
    pub buffer: bool,
    #[serde(rename = "__filename")]
    pub filename: bool,
    #[serde(rename = "__dirname")]
    pub dirname: bool,
    #[serde(rename = "setImmediate")]
    pub set_immediate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsOptions {
    pub colors: bool,
}

/// Complete, static description of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub schema_version: u32,
    pub mode: Mode,
    /// Base directory for entry sources and relative module requests.
    pub context: PathBuf,
    pub entry: EntryMap,
    pub output: OutputConfig,
    pub resolve: ResolveOptions,
    pub rules: RuleSet,
    pub plugins: PluginList,
    pub devtool: Devtool,
    pub node: NodeShims,
    pub stats: StatsOptions,
    pub dev_server: ServerConfig,
    /// Hints about inputs that were ignored or defaulted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl BuildPlan {
    /// Rule applied to the file at `path`, with its declaration index.
    ///
    /// Relative paths are taken relative to [`BuildPlan::context`]. Callers
    /// holding paths relative to the project root should join them onto the
    /// root first.
    #[must_use]
    pub fn select_rule(&self, path: &Path) -> Option<(usize, &TransformRule)> {
        if path.is_absolute() {
            self.rules.select(path)
        } else {
            self.rules.select(&self.context.join(path))
        }
    }

    /// Output file of every entry, in entry order.
    #[must_use]
    pub fn output_files(&self) -> Vec<PathBuf> {
        self.entry
            .iter()
            .map(|e| self.output.path.join(self.output.filename_for(&e.name)))
            .collect()
    }

    /// Pretty JSON form consumed by the bundler.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// BLAKE3 fingerprint of the compact JSON form.
    ///
    /// Equal plans have equal fingerprints.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(bundleplan_util::hash::fingerprint(&bytes))
    }
}
