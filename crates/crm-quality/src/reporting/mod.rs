//! Presentation of scan and campaign results.
//!
//! Results stay structured until they reach this module. Text is rendered
//! for terminals and chat messages; JSON reports are written with
//! [`ReportWriter`] (`--emit-report`) or printed directly (`--json`).

mod text;
mod writer;

pub use text::{NO_ISSUES_MESSAGE, format_currency, render_campaigns, render_scan_report};
pub use writer::ReportWriter;
