//! Printable documents
//!
//! - **label**: 60×40 mm ingredient and preparation labels
//! - **report**: monthly A4 temperature register with signatures
//! - **layout**: shared PDF drawing helpers
//!
//! Both workflows are read-only: labels share no state at all, reports read
//! the daily log and the company identity from the settings.

pub mod error;
pub mod label;
pub mod layout;
pub mod report;

pub use error::{DocumentError, DocumentResult, LabelError, ReportError};
pub use label::{LabelContent, LabelSpec, LABEL_HEIGHT_MM, LABEL_WIDTH_MM};
pub use layout::RenderedDocument;
pub use report::{MonthWindow, MonthlyReport, ReportRow, SignatureEntry};
