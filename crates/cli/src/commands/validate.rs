//! # CLI Validate Command
//!
//! Configuration validation for the fieldserve CLI.

use error::{AppError, Result};

/// Validates the CLI configuration
///
/// Accepts either `FIELDSERVE_DATABASE_URL` or the discrete
/// `FIELDSERVE_DATABASE_*` variables.
///
/// # Returns
///
/// A `Result` indicating success or failure.
pub fn validate() -> Result<()> {
    if std::env::var("FIELDSERVE_DATABASE_URL").is_ok() {
        return Ok(());
    }

    // Check required environment variables
    let required_vars = [
        "FIELDSERVE_DATABASE_HOST",
        "FIELDSERVE_DATABASE_PORT",
        "FIELDSERVE_DATABASE_NAME",
        "FIELDSERVE_DATABASE_USER",
        "FIELDSERVE_DATABASE_PASSWORD",
    ];

    let mut missing = Vec::new();
    for var in &required_vars {
        if std::env::var(var).is_err() {
            missing.push(var);
        }
    }

    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "Missing required environment variables: {:?}",
            missing
        )));
    }

    Ok(())
}
