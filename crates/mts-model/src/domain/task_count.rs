use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Number of tasks in one simulated batch.
///
/// Always at least one: zero, negative and non-numeric input is rejected with
/// [`ModelError::InvalidTaskCount`] before any task exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "usize")]
pub struct TaskCount(NonZeroUsize);

impl TaskCount {
    pub fn new(n: usize) -> Result<Self, ModelError> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidTaskCount(n.to_string()))
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl TryFrom<i64> for TaskCount {
    type Error = ModelError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .map_err(|_| ModelError::InvalidTaskCount(n.to_string()))
            .and_then(Self::new)
    }
}

impl From<TaskCount> for usize {
    fn from(count: TaskCount) -> Self {
        count.get()
    }
}

impl FromStr for TaskCount {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidTaskCount(s.to_string()))?;
        Self::try_from(n)
    }
}

impl fmt::Display for TaskCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_counts() {
        assert_eq!(TaskCount::new(5).unwrap().get(), 5);
        assert_eq!(" 12 ".parse::<TaskCount>().unwrap().get(), 12);
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(
            TaskCount::new(0).unwrap_err(),
            ModelError::InvalidTaskCount("0".into())
        );
        assert!("0".parse::<TaskCount>().is_err());
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!(matches!(
            "-3".parse::<TaskCount>(),
            Err(ModelError::InvalidTaskCount(_))
        ));
        assert!(matches!(
            "five".parse::<TaskCount>(),
            Err(ModelError::InvalidTaskCount(_))
        ));
        assert!(matches!(
            "".parse::<TaskCount>(),
            Err(ModelError::InvalidTaskCount(_))
        ));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: TaskCount = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<TaskCount>("0").is_err());
        assert!(serde_json::from_str::<TaskCount>("-1").is_err());
    }
}
