//! Hub 4 Prometheus Exporter
//!
//! A Prometheus metrics exporter for Hub 4 style DOCSIS cable modems.
//!
//! # Overview
//!
//! The exporter polls each modem's web UI status document, decodes its
//! positional JSON array into typed telemetry, and exposes DOCSIS channel and
//! provisioning state as Prometheus gauges. Every `/metrics` request runs one
//! fresh collection cycle across all configured modems.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐      HTTP GET        ┌──────────────┐
//! │  Hub 4      │ ◄─────────────────── │   Exporter   │
//! │  modem(s)   │   positional JSON    │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │Decoder │  │ ◄────────────► │ Prometheus │
//!                                      │  └────────┘  │   /metrics     └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Mapper  │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`hub4`] - status page client, positional decoder and telemetry types
//! - [`collectors`] - mapping of telemetry onto the metric catalog
//! - [`exporter`] - concurrent per-device collection cycle
//! - [`metrics`] - metric catalog and Prometheus rendering
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use hub4_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod exporter;
pub mod hub4;
pub mod metrics;
pub mod server;
