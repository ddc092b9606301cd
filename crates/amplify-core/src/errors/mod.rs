//! Error handling for Amplify.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod amplify_error;
pub mod config_error;
pub mod error_code;
pub mod genealogy_error;
pub mod mutation_report_error;
pub mod report_error;
pub mod tooling_error;

pub use amplify_error::{AmplifyError, AmplifyResult};
pub use config_error::ConfigError;
pub use error_code::AmplifyErrorCode;
pub use genealogy_error::GenealogyError;
pub use mutation_report_error::MutationReportError;
pub use report_error::ReportError;
pub use tooling_error::ToolingError;
