//! Storage layer for the tracker

pub mod database;

pub use database::{Batch, Store, TrackingRecord};
