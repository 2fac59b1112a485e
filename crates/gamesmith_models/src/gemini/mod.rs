//! Google Gemini REST client.
//!
//! One `generateContent` call per generation, bounded by the configured
//! timeout, with backend status codes mapped onto the gateway error taxonomy.

mod client;
mod config;
mod dto;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder, GeminiConfigBuilderError};
