//! API Routes
//!
//! Route handlers organized by view.

pub mod dashboard;
pub mod health;
pub mod labels;
pub mod logs;
pub mod report;
pub mod settings;
pub mod temperature;

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::documents::RenderedDocument;

/// Header carrying one user-facing notice per value on file downloads
pub const NOTICE_HEADER: HeaderName = HeaderName::from_static("x-haccp-notice");

/// Attachment response for a rendered PDF
pub(crate) fn pdf_response(document: RenderedDocument, notices: &[String]) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(RenderedDocument::MIME_TYPE),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", document.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    for notice in notices {
        match HeaderValue::from_str(notice) {
            Ok(value) => {
                headers.append(NOTICE_HEADER, value);
            }
            Err(_) => tracing::debug!(notice = %notice, "Notice not representable as a header"),
        }
    }

    (headers, document.bytes).into_response()
}
