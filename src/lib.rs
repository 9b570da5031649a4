//! WSA Weather Library
//!
//! This module exposes the forecast pipeline, application state and UI for
//! use by the binary and in integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod fetcher;
pub mod logging;
pub mod reshape;
pub mod ui;
