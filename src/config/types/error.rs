//! Configuration errors and validation diagnostics.

use super::FieldPath;
use crate::{log, utils::plural_count};
use owo_colors::OwoColorize;
use std::{fmt, io, path::PathBuf};
use thiserror::Error;

/// Reasons `blogport.toml` cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    // Rendered in full by Display, no #[source]
    #[error("{0}")]
    Invalid(ConfigDiagnostics),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fails validation.
    Error,
    /// Logged, the run continues.
    Warning,
}

/// One finding about one config key.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub severity: Severity,
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({} {hint})", "hint:".yellow())?;
        }
        Ok(())
    }
}

/// Findings gathered across all sections, so one run reports every problem.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    entries: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, field: FieldPath, message: String, hint: Option<String>) {
        self.entries.push(ConfigDiagnostic {
            severity,
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(Severity::Error, field, message.into(), Some(hint.into()));
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Warning, field, message.into(), None);
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ConfigDiagnostic> {
        self.entries.iter().filter(move |d| d.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigDiagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn report_warnings(&self) {
        for warning in self.with_severity(Severity::Warning) {
            log!("warning"; "{}", warning);
        }
    }

    /// Fail with every collected error, or pass when there are none.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.errors().next().is_none() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self))
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid configuration:".red().bold())?;
        for error in self.errors() {
            write!(f, "\n  {} {error}", "→".red())?;
        }
        let count = self.errors().count();
        if count > 1 {
            write!(f, "\n{}", plural_count(count, "error").dimmed())?;
        }
        Ok(())
    }
}
