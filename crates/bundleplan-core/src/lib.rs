#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod env;
pub mod error;
pub mod mode;
pub mod plan;
pub mod resolver;
pub mod version;

pub use config::Config;
pub use env::{PlanEnv, PortSetting, DEFAULT_PORT};
pub use error::{codes, PlanError};
pub use mode::Mode;
pub use plan::{BuildPlan, PLAN_SCHEMA_VERSION};
pub use resolver::{resolve, ResolveInput};
pub use version::VERSION;
