//! Core components of the tracker
//!
//! - **client**: tracking API authentication and lookups
//! - **normalize**: raw response → flat record
//! - **batch**: sequential batch orchestration and pacing
//! - **analytics**: summary statistics over normalized records

pub mod analytics;
pub mod batch;
pub mod client;
pub mod normalize;
