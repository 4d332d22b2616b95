//! Notebook Server Library
//!
//! Converts uploaded PDFs into note-taking layouts. The server binary is in
//! main.rs; this crate exposes the pieces it is built from for benchmarks and
//! tests.
//!
//! # Modules
//!
//! - `notebook`: Page geometry, pattern rendering, composition and the batch pipeline
//! - `workspace`: Per-request scratch directories
//! - `config`: Environment configuration
//! - `routes`: HTTP endpoints

pub mod config;
pub mod notebook;
pub mod routes;
pub mod state;
pub mod workspace;
