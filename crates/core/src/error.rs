use std::fmt;

use serde::{Deserialize, Serialize};

/// Which front end produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lex,
    Parse,
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lex => write!(f, "lex"),
            Stage::Parse => write!(f, "parse"),
            Stage::Extract => write!(f, "extract"),
        }
    }
}

/// A non-fatal problem found while reading DOT or IR input.
///
/// Diagnostics never stop processing on their own; the caller decides what
/// to do with them once the graph has been built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, line: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            stage,
            line,
            message: message.into(),
        }
    }

    pub fn lex(line: u32, message: impl Into<String>) -> Self {
        Diagnostic::new(Stage::Lex, line, message)
    }

    pub fn parse(line: u32, message: impl Into<String>) -> Self {
        Diagnostic::new(Stage::Parse, line, message)
    }

    pub fn extract(line: u32, message: impl Into<String>) -> Self {
        Diagnostic::new(Stage::Extract, line, message)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "line":    self.line,
            "message": self.message,
            "stage":   self.stage,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: line {}: {}", self.stage, self.line, self.message)
    }
}

/// Fatal errors: the surrounding I/O failed, not the input text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header or footer fragment could not be read.
    #[error("cannot read template fragment '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the rendered output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
