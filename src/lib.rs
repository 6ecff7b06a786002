//! risk-keys: risk-normalized order sizing for discretionary chart trading
//!
//! This library provides the core components for:
//! - Fixed-fractional order sizing from a drawn stop level
//! - Broker volume-step normalization
//! - Half-close and break-even position adjustments
//! - Button command dispatch over host capabilities
//! - Paper execution engine
//! - Logging and command metrics

pub mod cli;
pub mod config;
pub mod desk;
pub mod execution;
pub mod host;
pub mod market;
pub mod risk;
pub mod telemetry;
