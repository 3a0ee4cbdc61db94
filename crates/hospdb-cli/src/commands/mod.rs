//! Subcommand implementations

pub mod beds;
pub mod init;
pub mod patient;
pub mod stay;
pub mod ward;

use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Output mode shared by all commands
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as JSON, or run `plain` for human-readable output
    pub fn emit<T: Serialize>(&self, value: &T, plain: impl FnOnce()) -> CommandResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            plain();
        }
        Ok(())
    }
}
