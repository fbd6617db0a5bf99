//! `bundleplan match` command implementation.
//!
//! Reports the transform rule the plan selects for each given path.

use bundleplan_core::{resolve, Config};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct MatchJson {
    ok: bool,
    mode: String,
    matches: Vec<PathMatchJson>,
}

#[derive(Serialize)]
struct PathMatchJson {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<String>,
    loaders: Vec<String>,
}

pub fn run(config: &Config, mode: Option<&str>, paths: &[PathBuf], json: bool) -> Result<()> {
    let input = super::build_input(config, mode, None)?;
    let plan = match resolve(&input) {
        Ok(plan) => plan,
        Err(e) => super::fail(&e, json),
    };

    let matches: Vec<PathMatchJson> = paths
        .iter()
        .map(|raw| {
            let path = if raw.is_absolute() {
                raw.clone()
            } else {
                config.cwd.join(raw)
            };
            let selected = plan.select_rule(&path);
            tracing::trace!(
                path = %path.display(),
                rule = ?selected.map(|(i, _)| i),
                "rule lookup"
            );
            PathMatchJson {
                path: raw.display().to_string(),
                rule: selected.map(|(index, _)| index),
                test: selected.map(|(_, rule)| rule.test.as_str().to_string()),
                loaders: selected
                    .map(|(_, rule)| rule.loaders().map(String::from).collect())
                    .unwrap_or_default(),
            }
        })
        .collect();

    if json {
        let doc = MatchJson {
            ok: true,
            mode: plan.mode.to_string(),
            matches,
        };
        println!("{}", serde_json::to_string(&doc).into_diagnostic()?);
        return Ok(());
    }

    for m in &matches {
        match m.rule {
            Some(index) => println!("  {} -> {} (rule {index})", m.path, m.loaders.join(" -> ")),
            None => println!("  {} -> no matching rule", m.path),
        }
    }
    Ok(())
}
