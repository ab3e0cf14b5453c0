use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Multithreading execution model a run is dispatched with.
///
/// All three models execute the same tasks and account for them with the same formula;
/// they differ only in how workers are created, started and joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Simultaneous multithreading: the whole batch is issued onto a pool sized to the batch.
    Smt,
    /// Interleaved multithreading: one worker per task, started as soon as it is created.
    Imt,
    /// Block multithreading: every worker of the block exists before any of them starts.
    Bmt,
}

impl Model {
    /// Every model, in the order they are compared.
    pub const ALL: [Model; 3] = [Model::Smt, Model::Imt, Model::Bmt];

    /// Returns a short symbolic identifier for the model.
    ///
    /// Used for logging, metric labels and routing:
    /// - `"smt"`
    /// - `"imt"`
    /// - `"bmt"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Smt => "smt",
            Model::Imt => "imt",
            Model::Bmt => "bmt",
        }
    }

    /// Prefix of the task labels produced for this model (`SMT-0`, `IMT-3`, ...).
    pub fn task_prefix(&self) -> &'static str {
        match self {
            Model::Smt => "SMT",
            Model::Imt => "IMT",
            Model::Bmt => "BMT",
        }
    }

    /// Label of the `index`-th task of a batch.
    pub fn task_name(&self, index: usize) -> String {
        format!("{}-{index}", self.task_prefix())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_prefix())
    }
}

impl FromStr for Model {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "smt" | "simultaneous" => Ok(Model::Smt),
            "imt" | "interleaved" | "implicit" => Ok(Model::Imt),
            "bmt" | "block" => Ok(Model::Bmt),
            _ => Err(ModelError::UnknownModel(s.to_string())),
        }
    }
}
