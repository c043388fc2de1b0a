//! BioCore verification pipeline library exports

pub mod bridge;
pub mod config;
pub mod fingerprint;
pub mod gateway;
