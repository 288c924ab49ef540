// Nova Intake - Upload Intake and Engagement Service
// Copyright (c) 2025 Nova Enterprises
// Licensed under the MIT License

//! # Nova Intake
//!
//! Nova Intake is a small HTTP backend that records the metadata of files
//! clients upload, keeps a per-client engagement ledger, and relays support
//! reports to an operator by email.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fingerprinting** uploads with a streaming SHA-256 digest; file bytes are never stored
//! - **Recording** upload metadata in a document store (PostgreSQL JSONB or in-memory)
//! - **Crediting** clients through an atomic upsert-with-increment ledger
//! - **Relaying** support reports with a single best-effort SMTP attempt
//!
//! ## Architecture
//!
//! Nova Intake follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`http`] - Routes, shared state and the axum server
//! - [`core`] - Business logic (digest, intake, ledger, dispatch, assistant)
//! - [`adapters`] - Document stores and mail transports
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nova_intake::config::load_config_or_default;
//! use nova_intake::http::{AppState, HttpServer};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("nova.toml")?;
//!     let state = AppState::from_config(&config)?;
//!
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     HttpServer::new(config.server.clone(), state)
//!         .serve(shutdown_rx)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Engagement Ledger
//!
//! Every recorded upload credits its client with 10 points through the
//! store's atomic upsert, so concurrent uploads never lose an increment:
//!
//! ```rust,no_run
//! use nova_intake::adapters::memory::MemoryStore;
//! use nova_intake::core::EngagementLedger;
//! use nova_intake::domain::ClientId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = EngagementLedger::new(Arc::new(MemoryStore::new()));
//! let client = ClientId::new("client-42")?;
//!
//! ledger.award_upload(&client).await?;
//! let progress = ledger.progress(&client).await?;
//! assert_eq!(progress.points, 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Nova Intake uses the [`domain::NovaError`] type for all errors. The HTTP
//! layer maps it onto status codes and `{detail, code}` bodies.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod logging;
