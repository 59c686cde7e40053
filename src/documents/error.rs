//! Document error types

use thiserror::Error;

/// Errors raised while producing a PDF
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl From<printpdf::Error> for DocumentError {
    fn from(err: printpdf::Error) -> Self {
        DocumentError::Pdf(err.to_string())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Label form errors
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Enter a name for the label")]
    BlankName,

    #[error(transparent)]
    Render(#[from] DocumentError),
}

/// Monthly report errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Nothing was logged in the month; not a failure, nothing to export
    #[error("No entries found for {month}")]
    NoEntries { month: String },

    #[error(transparent)]
    Render(#[from] DocumentError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ReportError::NoEntries {
            month: "ottobre 2026".to_string(),
        };
        assert_eq!(err.to_string(), "No entries found for ottobre 2026");

        let err = LabelError::from(DocumentError::Pdf("broken".to_string()));
        assert_eq!(err.to_string(), "PDF error: broken");
    }
}
