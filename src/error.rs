//! Fatal workbook errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a run before any report is written.
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("failed to open workbook {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("No '{sheet}' sheet found! Available sheets: {}", available.join(", "))]
    MissingSheet { sheet: String, available: Vec<String> },

    #[error("failed to read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sheet_message() {
        let err = WorkbookError::MissingSheet {
            sheet: "Wedstrijd".to_string(),
            available: vec!["Blad1".to_string(), "Inschrijvingen".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'Wedstrijd'"));
        assert!(msg.contains("Blad1, Inschrijvingen"));
    }
}
