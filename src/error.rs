use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// The plan is incomplete; every problem found is listed.
    #[error("Flight plan is not ready to simulate: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Upstream data is internally inconsistent (e.g. a runway with one end).
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl SnapshotError {
    /// Messages suitable for the planning screen.
    pub fn messages(&self) -> Vec<String> {
        match self {
            SnapshotError::Validation(errors) => errors.clone(),
            SnapshotError::Invariant(msg) => vec![msg.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_everything() {
        let err = SnapshotError::Validation(vec!["Missing route".into(), "Missing aircraft".into()]);
        let text = err.to_string();
        assert!(text.contains("Missing route; Missing aircraft"), "got {}", text);
        assert_eq!(err.messages().len(), 2);
    }
}
