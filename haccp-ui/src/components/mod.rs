//! UI Components
//!
//! Reusable Leptos components shared by the views.

pub mod download;
pub mod loading;
pub mod nav;
pub mod signature_pad;
pub mod toast;

pub use download::save_download;
pub use loading::{Loading, LogbookSkeleton};
pub use nav::Nav;
pub use signature_pad::SignaturePad;
pub use toast::Toast;
