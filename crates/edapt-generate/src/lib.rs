//! EdAPT Generation Client
//!
//! HTTP client for an Ollama-compatible model runtime, implementing the
//! session core's [`Generator`](edapt_session::Generator) seam.

pub mod client;

pub use client::OllamaClient;
