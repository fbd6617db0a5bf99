//! Build plan resolution.
//!
//! [`resolve`] turns a project root, an optional mode and an environment
//! snapshot into a complete [`BuildPlan`]. It reads no files: paths are
//! joined lexically and the environment is whatever the caller captured.

use bundleplan_util::fs;
use crate::env::{PlanEnv, PortSetting, DEFAULT_PORT};
use crate::error::PlanError;
use crate::mode::Mode;
use crate::plan::{
    BuildPlan, Condition, DefinePass, Devtool, EntryMap, Enforce, HtmlMinify, HtmlPass,
    MinifyPass, NodeShims, OutputConfig, Pass, PluginList, ResolveOptions, RuleSet,
    ServerConfig, StatsOptions, Transform, TransformRule, PLAN_SCHEMA_VERSION,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Loader names used by the rule table.
pub mod loaders {
    pub const SOURCE_MAP: &str = "source-map-loader";
    pub const BABEL: &str = "babel-loader";
    pub const CSS: &str = "css-loader";
    pub const POSTCSS: &str = "postcss-loader";
    pub const JSON: &str = "json-loader";
    pub const RAW: &str = "raw-loader";
    /// May inline small files as data URLs.
    pub const URL: &str = "url-loader";
    /// Always emits a separate file.
    pub const FILE: &str = "file-loader";
}

/// Source directory, relative to the root. Also the plan context.
pub const SOURCE_DIR: &str = "src";

/// Output directory, relative to the root.
pub const OUTPUT_DIR: &str = "build";

/// Bundle name → source path relative to [`SOURCE_DIR`].
pub const ENTRIES: &[(&str, &str)] = &[
    ("netlify-identity-widget", "./index.js"),
    ("netlify-identity", "./netlify-identity.js"),
];

/// Style-sheet pipeline stages run by the post-processing transform.
pub const POSTCSS_STAGES: &[&str] = &["postcss-import", "postcss-nested", "postcss-cssnext"];

const SCRIPT_TEST: &str = r"\.jsx?$";
const STYLE_TEST: &str = r"\.(css)$";
const DATA_TEST: &str = r"\.json$";
const TEXT_TEST: &str = r"\.(xml|html|txt|md)$";
const MEDIA_TEST: &str = r"(?i)\.(svg|woff2?|ttf|eot|jpe?g|png|gif)(\?.*)?$";

/// Inputs to [`resolve`].
#[derive(Debug, Clone)]
pub struct ResolveInput {
    /// Project root; every plan path is derived from it.
    pub root: PathBuf,
    /// Explicit mode. When `None`, `NODE_ENV` from `env` is used.
    pub mode: Option<String>,
    pub env: PlanEnv,
}

impl ResolveInput {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: None,
            env: PlanEnv::new(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, env: PlanEnv) -> Self {
        self.env = env;
        self
    }

    /// The mode this input resolves to.
    #[must_use]
    pub fn effective_mode(&self) -> Mode {
        Mode::from_env_value(self.mode.as_deref().or_else(|| self.env.node_env()))
    }
}

/// Build the plan for `input`.
///
/// Either the whole plan is returned or an error describing which static
/// table is inconsistent. A relative root is taken against the current
/// directory, so every path in the plan is absolute.
pub fn resolve(input: &ResolveInput) -> Result<BuildPlan, PlanError> {
    let mode = input.effective_mode();
    let root = fs::absolute(&input.root).unwrap_or_else(|_| input.root.clone());
    let root = root.as_path();
    let mut notes = Vec::new();

    let port = match input.env.port() {
        PortSetting::Unset => DEFAULT_PORT,
        PortSetting::Valid(port) => port,
        PortSetting::Invalid(raw) => {
            notes.push(format!(
                "PORT={raw:?} is not a valid port; using {DEFAULT_PORT}"
            ));
            DEFAULT_PORT
        }
    };

    Ok(BuildPlan {
        schema_version: PLAN_SCHEMA_VERSION,
        mode,
        context: root.join(SOURCE_DIR),
        entry: EntryMap::from_pairs(ENTRIES.iter().copied())?,
        output: OutputConfig {
            path: root.join(OUTPUT_DIR),
            public_path: "/".to_string(),
            filename: "[name].js".to_string(),
        },
        resolve: resolve_options(root),
        rules: transform_rules(root, mode)?,
        plugins: build_passes(mode),
        devtool: Devtool::for_mode(mode),
        node: NodeShims {
            global: true,
            process: false,
            buffer: false,
            filename: false,
            dirname: false,
            set_immediate: false,
        },
        stats: StatsOptions { colors: true },
        dev_server: ServerConfig {
            port,
            host: "localhost".to_string(),
            public_path: "/".to_string(),
            content_base: format!("./{SOURCE_DIR}"),
            history_api_fallback: true,
            open: true,
            open_page: String::new(),
            proxy: Vec::new(),
        },
        notes,
    })
}

fn resolve_options(root: &Path) -> ResolveOptions {
    let path_alias = |rel: &str| root.join(rel).to_string_lossy().into_owned();

    let mut alias = BTreeMap::new();
    alias.insert("components".to_string(), path_alias("src/components"));
    alias.insert("style".to_string(), path_alias("src/style"));
    alias.insert("react".to_string(), "preact-compat".to_string());
    alias.insert("react-dom".to_string(), "preact-compat".to_string());

    ResolveOptions {
        extensions: [".jsx", ".js", ".json"].map(String::from).to_vec(),
        modules: vec![
            root.join("src/lib"),
            root.join("node_modules"),
            PathBuf::from("node_modules"),
        ],
        alias,
    }
}

fn transform_rules(root: &Path, mode: Mode) -> Result<RuleSet, PlanError> {
    let media_loader = if mode.is_production() {
        loaders::FILE
    } else {
        loaders::URL
    };

    let rules = vec![
        // Pick up upstream source maps for scripts outside our own sources.
        TransformRule::new(SCRIPT_TEST)?
            .exclude(Condition::Path(root.join(SOURCE_DIR)))
            .enforce(Enforce::Pre)
            .then(Transform::new(loaders::SOURCE_MAP)),
        TransformRule::new(SCRIPT_TEST)?
            .exclude(Condition::pattern("node_modules")?)
            .then(Transform::new(loaders::BABEL)),
        TransformRule::new(STYLE_TEST)?
            .include(Condition::Path(root.join("src/components")))
            .then(Transform::new(loaders::CSS).with_options(json!({ "importLoaders": 1 })))
            .then(Transform::new(loaders::POSTCSS).with_options(json!({
                "sourceMap": !mode.is_production(),
                "plugins": POSTCSS_STAGES,
            }))),
        TransformRule::new(DATA_TEST)?.then(Transform::new(loaders::JSON)),
        TransformRule::new(TEXT_TEST)?.then(Transform::new(loaders::RAW)),
        TransformRule::new(MEDIA_TEST)?.then(Transform::new(media_loader)),
    ];

    RuleSet::try_from(rules)
}

fn build_passes(mode: Mode) -> PluginList {
    let mut passes = PluginList::new();
    passes.push(Pass::NoEmitOnErrors);
    passes.push(Pass::Define(DefinePass::for_mode(mode)));
    passes.push(Pass::Html(HtmlPass {
        template: "./index.ejs".to_string(),
        filename: "index.html".to_string(),
        inject: false,
        minify: HtmlMinify {
            collapse_whitespace: true,
        },
    }));
    if mode.is_production() {
        passes.push(Pass::Minify(MinifyPass::production()));
    }
    passes
}
