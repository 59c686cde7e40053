//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod labels;
pub mod report;
pub mod settings;
pub mod temperature;

pub use dashboard::Dashboard;
pub use labels::Labels;
pub use report::Report;
pub use settings::Settings;
pub use temperature::Temperature;
