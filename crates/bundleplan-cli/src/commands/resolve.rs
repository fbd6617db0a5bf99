//! `bundleplan resolve` command implementation.
//!
//! Resolves the build plan for the project root and prints it, or writes it
//! to a file for the bundler to pick up.

use bundleplan_core::{resolve, BuildPlan};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Resolve command action.
#[derive(Debug, Clone)]
pub struct ResolveAction {
    /// Mode override.
    pub mode: Option<String>,
    /// Port override.
    pub port: Option<u16>,
    /// Destination for the plan JSON.
    pub out: Option<PathBuf>,
}

/// JSON summary printed when the plan went to a file.
#[derive(Serialize)]
struct WrittenJson {
    ok: bool,
    schema_version: u32,
    mode: String,
    out: String,
    fingerprint: String,
    duration_ms: u64,
}

pub fn run(config: &bundleplan_core::Config, action: ResolveAction, json: bool) -> Result<()> {
    let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %config.cwd.display());
    let _guard = span.enter();
    let start = Instant::now();

    let input = super::build_input(config, action.mode.as_deref(), action.port)?;
    let plan = match resolve(&input) {
        Ok(plan) => plan,
        Err(e) => super::fail(&e, json),
    };
    for note in &plan.notes {
        tracing::warn!("{note}");
    }

    let fingerprint = plan.fingerprint().into_diagnostic()?;
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::debug!(mode = %plan.mode, %fingerprint, duration_ms, "plan resolved");

    if let Some(out) = &action.out {
        let out = if out.is_absolute() {
            out.clone()
        } else {
            config.cwd.join(out)
        };
        let body = plan.to_json_pretty().into_diagnostic()?;
        bundleplan_util::fs::write_atomic(&out, body.as_bytes()).into_diagnostic()?;
        tracing::info!(out = %out.display(), "wrote build plan");

        if json {
            let doc = WrittenJson {
                ok: true,
                schema_version: plan.schema_version,
                mode: plan.mode.to_string(),
                out: out.display().to_string(),
                fingerprint,
                duration_ms,
            };
            println!("{}", serde_json::to_string(&doc).into_diagnostic()?);
        } else {
            print_summary(&plan, &fingerprint).into_diagnostic()?;
            println!("  written to {}", out.display());
        }
        return Ok(());
    }

    if json {
        println!("{}", plan.to_json_pretty().into_diagnostic()?);
    } else {
        print_summary(&plan, &fingerprint).into_diagnostic()?;
    }
    Ok(())
}

fn print_summary(plan: &BuildPlan, fingerprint: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();

    writeln!(out, "  mode         {}", plan.mode)?;
    writeln!(out, "  context      {}", plan.context.display())?;

    writeln!(out, "  entries")?;
    for (entry, file) in plan.entry.iter().zip(plan.output_files()) {
        writeln!(out, "    {} ({}) -> {}", entry.name, entry.source, file.display())?;
    }

    writeln!(out, "  rules")?;
    for (index, rule) in plan.rules.iter().enumerate() {
        let loaders: Vec<&str> = rule.loaders().collect();
        let enforce = rule
            .enforce
            .map(|e| format!(" [{}]", e.as_str()))
            .unwrap_or_default();
        writeln!(
            out,
            "    {index}  {:<48} {}{enforce}",
            rule.test.as_str(),
            loaders.join(" -> ")
        )?;
    }

    let passes: Vec<&str> = plan.plugins.names().collect();
    writeln!(out, "  passes       {}", passes.join(", "))?;
    if let Some(minify) = plan.plugins.minify() {
        let enabled = minify.compress.toggles().iter().filter(|(_, on)| *on).count();
        writeln!(out, "  minifier     {enabled} compress toggles enabled")?;
    }
    writeln!(out, "  devtool      {}", plan.devtool.as_str())?;
    writeln!(out, "  dev server   {}", plan.dev_server.open_url())?;
    writeln!(
        out,
        "  fingerprint  {}",
        bundleplan_util::hash::short(fingerprint)
    )?;
    Ok(())
}
