//! # StudyOS
//!
//! A command-line study assistant backed by a remote AI service. It offers
//! four tools: a doubt solver, an exam planner, a video summarizer and a
//! revision notes generator.
//!
//! ## Architecture
//!
//! - [`models`]: task kinds, requests and parsed results
//! - [`client`]: the [`Transport`] seam and the [`Dispatcher`] that validates,
//!   sends and parses requests
//! - [`app`]: per-tool panel state (idle, loading, showing, failed)
//! - [`ui`]: terminal presentation, theme and status output
//! - [`export`]: page layout and PDF output
//! - [`config`]: configuration file and environment handling
//! - [`utils`]: text wrapping, terminal detection and validation

pub mod app;
pub mod client;
pub mod config;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{PanelState, TaskPanel};
pub use client::{DispatchError, Dispatcher, Endpoints, HttpTransport, Transport};
pub use models::{StudyRequest, StudyResult, TaskKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
