//! Non-fatal diagnostics threaded through every analysis stage.
//!
//! Every stage returns `(value, diagnostics)` rather than failing the run;
//! the aggregator carries all of them into the final result so a consumer
//! can distinguish "nothing found" from "something failed".

use serde::{Deserialize, Serialize};

/// Which stage of the pipeline produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Load,
    Index,
    Classify,
    Resolve,
}

/// A non-fatal record of a failure or anomaly encountered during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    /// Source file the diagnostic refers to, when known.
    pub file: Option<String>,
    /// 1-based line, when known.
    pub line: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            file: None,
            line: None,
            message: message.into(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}
