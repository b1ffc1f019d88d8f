//! # Taskboard API Server Library
//!
//! HTTP layer of the Taskboard project tracker.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `envelope`: Success response wrapper
//! - `extract`: Request extractors with envelope rejections
//! - `middleware`: HTTP middleware layers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
