#[derive(Debug, thiserror::Error)]
pub enum CinestatError {
    #[error("Insufficient data: got {got}, required {required}. {context}")]
    InsufficientData {
        got: usize,
        required: usize,
        context: String,
    },
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde YAML Error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("SQLite Error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Plot Error: {0}")]
    PlotError(String),
}

impl CinestatError {
    /// Structural errors abort a single comparison but never the whole batch.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CinestatError::InsufficientData { .. } | CinestatError::DegenerateInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors() {
        let insufficient = CinestatError::InsufficientData {
            got: 1,
            required: 2,
            context: "test".to_string(),
        };
        assert!(insufficient.is_structural());
        assert!(CinestatError::DegenerateInput("flat".to_string()).is_structural());
        assert!(!CinestatError::InvalidConfig("bad".to_string()).is_structural());
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = CinestatError::InsufficientData {
            got: 0,
            required: 2,
            context: "Empty series".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: got 0, required 2. Empty series"
        );
    }
}
