use serde::{Deserialize, Serialize};

use crate::{Model, ModelError, TaskCount};

/// Validated request for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSpec {
    pub task_count: TaskCount,
    pub model: Model,
}

impl RunSpec {
    pub fn new(task_count: TaskCount, model: Model) -> Self {
        Self { task_count, model }
    }

    /// Build a spec from raw user input (e.g. a text field and a selector).
    ///
    /// The task count is validated first, so `("0", "nope")` reports the count.
    pub fn parse(task_count: &str, model: &str) -> Result<Self, ModelError> {
        let task_count = task_count.parse()?;
        let model = model.parse()?;
        Ok(Self { task_count, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_input() {
        let spec = RunSpec::parse("5", "smt").unwrap();
        assert_eq!(spec.task_count.get(), 5);
        assert_eq!(spec.model, Model::Smt);
    }

    #[test]
    fn parse_reports_task_count_first() {
        let err = RunSpec::parse("0", "nope").unwrap_err();
        assert_eq!(err, ModelError::InvalidTaskCount("0".into()));
    }

    #[test]
    fn parse_reports_unknown_model() {
        let err = RunSpec::parse("3", "nope").unwrap_err();
        assert_eq!(err, ModelError::UnknownModel("nope".into()));
    }

    #[test]
    fn serde_camel_case() {
        let spec: RunSpec = serde_json::from_str(r#"{"taskCount":4,"model":"bmt"}"#).unwrap();
        assert_eq!(spec, RunSpec::new(TaskCount::new(4).unwrap(), Model::Bmt));

        let bad = serde_json::from_str::<RunSpec>(r#"{"taskCount":0,"model":"bmt"}"#);
        assert!(bad.is_err());
    }
}
