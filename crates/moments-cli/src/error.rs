use std::process::ExitCode;

use moments_core::MomentsError;
use serde::Serialize;

use crate::cli::OutputFormat;

pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;

/// A failed command.
///
/// Serializes directly as the JSON envelope written to stderr with
/// `--output-format json`.
#[derive(Debug, Serialize, thiserror::Error)]
#[error("{error}")]
pub struct CliError {
    error: String,
    exit_code: u8,
}

impl CliError {
    /// Bad arguments, config or input files.
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            exit_code: EXIT_INPUT_ERROR,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            exit_code: EXIT_RUNTIME_ERROR,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Write the error to stderr and return the process exit code.
    pub fn report(&self, output_format: OutputFormat) -> ExitCode {
        let json = match output_format {
            OutputFormat::Json => serde_json::to_string_pretty(self).ok(),
            OutputFormat::Text => None,
        };
        match json {
            Some(json) => eprintln!("{json}"),
            None => eprintln!("Error: {self}"),
        }
        ExitCode::from(self.exit_code)
    }
}

impl From<MomentsError> for CliError {
    fn from(err: MomentsError) -> Self {
        match err {
            MomentsError::Store(_) => CliError::runtime(err.to_string()),
            MomentsError::InvalidTimezone(_)
            | MomentsError::ParseError(_)
            | MomentsError::InvalidConfig(_) => CliError::input(err.to_string()),
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Print `value` on stdout: pretty JSON, or whatever `text` prints.
pub fn emit<T: Serialize>(
    output_format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T),
) -> CliResult<()> {
    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Text => text(value),
    }
    Ok(())
}
