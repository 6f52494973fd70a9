//! Guided position drafting and browsing for hiring teams.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
