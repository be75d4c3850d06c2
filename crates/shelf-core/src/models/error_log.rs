use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Severity stored alongside persisted pipeline anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorLogLevel {
    Warn,
    Error,
}

impl ErrorLogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorLogLevel::Warn => "WARN",
            ErrorLogLevel::Error => "ERROR",
        }
    }
}

impl Display for ErrorLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Entry to append to the `error_logs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewErrorLog {
    pub message: String,
    pub level: ErrorLogLevel,
    pub route: String,
}

impl NewErrorLog {
    pub fn warn(message: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ErrorLogLevel::Warn,
            route: route.into(),
        }
    }
}
