use bundleplan_core::version::version_string;
use bundleplan_core::{PLAN_SCHEMA_VERSION, VERSION};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

#[derive(Serialize)]
struct VersionJson {
    version: &'static str,
    plan_schema_version: u32,
}

pub fn run(json: bool) -> Result<()> {
    if json {
        let doc = VersionJson {
            version: VERSION,
            plan_schema_version: PLAN_SCHEMA_VERSION,
        };
        println!("{}", serde_json::to_string(&doc).into_diagnostic()?);
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
