//! Feature planning sheet: categories of feature rows with assigned actors,
//! editable through a small HTTP API and exportable as a PDF report.

pub mod api;
pub mod config;
pub mod models;
pub mod outline;
pub mod report;
pub mod sheet;
