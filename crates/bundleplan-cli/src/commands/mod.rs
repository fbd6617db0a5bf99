pub mod match_path;
pub mod resolve;
pub mod version;

use bundleplan_core::env::PORT;
use bundleplan_core::{Config, Mode, PlanEnv, PlanError, ResolveInput};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Capture the construction inputs for a resolve.
///
/// `.env` files are chosen by the mode known before they are read: the
/// `--mode` flag, else the process `NODE_ENV`.
pub fn build_input(config: &Config, mode: Option<&str>, port: Option<u16>) -> Result<ResolveInput> {
    let env = if config.env_files {
        let process_mode = std::env::var(bundleplan_core::env::NODE_ENV).ok();
        let file_mode = Mode::from_env_value(mode.or(process_mode.as_deref()));
        tracing::debug!(root = %config.cwd.display(), mode = %file_mode, "loading .env files");
        PlanEnv::from_process_and_files(&config.cwd, file_mode.as_str()).into_diagnostic()?
    } else {
        PlanEnv::from_process()
    };

    let env = match port {
        Some(port) => env.with(PORT, port.to_string()),
        None => env,
    };

    let mut input = ResolveInput::new(config.cwd.clone()).with_env(env);
    if let Some(mode) = mode {
        input = input.with_mode(mode);
    }
    tracing::debug!(mode = %input.effective_mode(), "resolved build mode");
    Ok(input)
}

#[derive(Debug, Serialize)]
struct ErrorJson {
    ok: bool,
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

fn error_json(err: &PlanError) -> ErrorJson {
    ErrorJson {
        ok: false,
        error: ErrorBody {
            code: err.code(),
            message: err.to_string(),
        },
    }
}

/// Report a plan error and exit with status 1.
pub fn fail(err: &PlanError, json: bool) -> ! {
    if json {
        match serde_json::to_string(&error_json(err)) {
            Ok(s) => println!("{s}"),
            Err(_) => eprintln!("error: {err}"),
        }
    } else {
        eprintln!("error[{}]: {err}", err.code());
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundleplan_core::codes;

    #[test]
    fn test_error_json_document() {
        let err = PlanError::DuplicateEntry {
            name: "netlify-identity".to_string(),
        };
        let doc = serde_json::to_value(error_json(&err)).unwrap();

        assert_eq!(doc["ok"], false);
        assert_eq!(doc["error"]["code"], codes::PLAN_DUPLICATE_ENTRY);
        assert_eq!(doc["error"]["message"], err.to_string());
        assert!(doc["error"]["message"]
            .as_str()
            .unwrap()
            .contains("netlify-identity"));
    }
}
