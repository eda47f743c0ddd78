//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod campaigns;
pub mod detail;
pub mod footer;
pub mod header;
pub mod logs;
