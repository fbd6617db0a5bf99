//! Whole-build passes.
//!
//! Passes run in list order. The minifier is the only production-only pass;
//! its compress settings are a fixed struct with one field per toggle so each
//! toggle can be asserted on its own.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source expression replaced by the define pass.
pub const NODE_ENV_EXPR: &str = "process.env.NODE_ENV";

/// A whole-build pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pass", rename_all = "kebab-case")]
pub enum Pass {
    /// Abort output when any transform reports an error.
    NoEmitOnErrors,
    /// Replace expressions with constant source text.
    Define(DefinePass),
    /// Generate the HTML document that loads the bundles.
    Html(HtmlPass),
    /// Minify emitted scripts.
    Minify(MinifyPass),
}

impl Pass {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoEmitOnErrors => "no-emit-on-errors",
            Self::Define(_) => "define",
            Self::Html(_) => "html",
            Self::Minify(_) => "minify",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinePass {
    /// Expression → replacement source text.
    pub definitions: BTreeMap<String, String>,
}

impl DefinePass {
    /// Inject the mode as a string literal for `process.env.NODE_ENV`.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        let mut definitions = BTreeMap::new();
        definitions.insert(
            NODE_ENV_EXPR.to_string(),
            serde_json::Value::String(mode.as_str().to_string()).to_string(),
        );
        Self { definitions }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPass {
    /// Template path, relative to the plan context.
    pub template: String,
    /// Output document name.
    pub filename: String,
    /// Whether the generator injects bundle tags itself.
    pub inject: bool,
    pub minify: HtmlMinify,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlMinify {
    pub collapse_whitespace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyPass {
    pub output: MinifyOutput,
    pub compress: CompressOptions,
}

impl MinifyPass {
    /// Settings used for production builds.
    #[must_use]
    pub fn production() -> Self {
        Self {
            output: MinifyOutput { comments: false },
            compress: CompressOptions::aggressive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyOutput {
    /// Keep comments in output.
    pub comments: bool,
}

/// Compressor toggles. Every field is independent; none implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CompressOptions {
    pub unsafe_comps: bool,
    pub properties: bool,
    pub keep_fargs: bool,
    pub pure_getters: bool,
    pub collapse_vars: bool,
    #[serde(rename = "unsafe")]
    pub unsafe_: bool,
    pub warnings: bool,
    pub screw_ie8: bool,
    pub sequences: bool,
    pub dead_code: bool,
    pub drop_debugger: bool,
    pub comparisons: bool,
    pub conditionals: bool,
    pub evaluate: bool,
    pub booleans: bool,
    pub loops: bool,
    pub unused: bool,
    pub hoist_funs: bool,
    pub if_return: bool,
    pub join_vars: bool,
    pub cascade: bool,
    pub drop_console: bool,
}

impl CompressOptions {
    /// The production toggle set.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            unsafe_comps: true,
            properties: true,
            keep_fargs: false,
            pure_getters: true,
            collapse_vars: true,
            unsafe_: true,
            warnings: false,
            screw_ie8: true,
            sequences: true,
            dead_code: true,
            drop_debugger: true,
            comparisons: true,
            conditionals: true,
            evaluate: true,
            booleans: true,
            loops: true,
            unused: true,
            hoist_funs: true,
            if_return: true,
            join_vars: true,
            cascade: true,
            drop_console: true,
        }
    }

    /// Every toggle with its serialized name, in declaration order.
    #[must_use]
    pub fn toggles(&self) -> [(&'static str, bool); 22] {
        [
            ("unsafe_comps", self.unsafe_comps),
            ("properties", self.properties),
            ("keep_fargs", self.keep_fargs),
            ("pure_getters", self.pure_getters),
            ("collapse_vars", self.collapse_vars),
            ("unsafe", self.unsafe_),
            ("warnings", self.warnings),
            ("screw_ie8", self.screw_ie8),
            ("sequences", self.sequences),
            ("dead_code", self.dead_code),
            ("drop_debugger", self.drop_debugger),
            ("comparisons", self.comparisons),
            ("conditionals", self.conditionals),
            ("evaluate", self.evaluate),
            ("booleans", self.booleans),
            ("loops", self.loops),
            ("unused", self.unused),
            ("hoist_funs", self.hoist_funs),
            ("if_return", self.if_return),
            ("join_vars", self.join_vars),
            ("cascade", self.cascade),
            ("drop_console", self.drop_console),
        ]
    }
}

/// Ordered whole-build passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginList {
    passes: Vec<Pass>,
}

impl PluginList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pass: Pass) {
        self.passes.push(pass);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pass> {
        self.passes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(Pass::name)
    }

    #[must_use]
    pub fn define(&self) -> Option<&DefinePass> {
        self.passes.iter().find_map(|p| match p {
            Pass::Define(d) => Some(d),
            _ => None,
        })
    }

    #[must_use]
    pub fn html(&self) -> Option<&HtmlPass> {
        self.passes.iter().find_map(|p| match p {
            Pass::Html(h) => Some(h),
            _ => None,
        })
    }

    #[must_use]
    pub fn minify(&self) -> Option<&MinifyPass> {
        self.passes.iter().find_map(|p| match p {
            Pass::Minify(m) => Some(m),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_quotes_mode() {
        let define = DefinePass::for_mode(Mode::Production);
        assert_eq!(define.definitions[NODE_ENV_EXPR], "\"production\"");
        let define = DefinePass::for_mode(Mode::Development);
        assert_eq!(define.definitions[NODE_ENV_EXPR], "\"development\"");
    }

    #[test]
    fn test_toggles_cover_every_field() {
        let json = serde_json::to_value(CompressOptions::aggressive()).unwrap();
        let fields = json.as_object().unwrap();
        let toggles = CompressOptions::aggressive().toggles();
        assert_eq!(fields.len(), toggles.len());
        for (name, value) in toggles {
            assert_eq!(fields[name], serde_json::Value::Bool(value), "{name}");
        }
    }

    #[test]
    fn test_pass_tagging() {
        let json = serde_json::to_value(Pass::NoEmitOnErrors).unwrap();
        assert_eq!(json, serde_json::json!({ "pass": "no-emit-on-errors" }));

        let json = serde_json::to_value(Pass::Minify(MinifyPass::production())).unwrap();
        assert_eq!(json["pass"], "minify");
        assert_eq!(json["output"]["comments"], false);
        assert_eq!(json["compress"]["unsafe"], true);
    }

    #[test]
    fn test_html_camel_case() {
        let html = HtmlPass {
            template: "./index.ejs".to_string(),
            filename: "index.html".to_string(),
            inject: false,
            minify: HtmlMinify {
                collapse_whitespace: true,
            },
        };
        let json = serde_json::to_value(&html).unwrap();
        assert_eq!(json["minify"]["collapseWhitespace"], true);
    }

    #[test]
    fn test_lookup_helpers() {
        let mut list = PluginList::new();
        list.push(Pass::NoEmitOnErrors);
        list.push(Pass::Define(DefinePass::for_mode(Mode::Development)));
        assert!(list.define().is_some());
        assert!(list.minify().is_none());
        assert!(list.html().is_none());
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["no-emit-on-errors", "define"]);
    }
}
