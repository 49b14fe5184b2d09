//! Ollama integration for tabrag
//!
//! This crate provides the Ollama implementations of the Embedder and
//! Generator traits: one HTTP client serving `/api/embed` for vectors and
//! `/api/generate` for answers.

mod client;
mod config;


pub use client::OllamaClient;
pub use config::OllamaConfig;

// Re-export core types for convenience
pub use tabrag_core::{Embedder, Error, Generator, Result};
