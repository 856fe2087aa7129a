//! # Research Graph
//!
//! LLM agent workflows for finding papers on arXiv, plus small MCP tool
//! servers and a web endpoint built around them.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`graphs`]: Article search and chatbot workflows
//! - [`llm`]: Chat model providers (Vertex AI, OpenAI) and output parsing
//! - [`tools`]: Date window resolution, document loading, the paper search tool
//! - [`sources`]: Paper index clients (arXiv)
//! - [`mcp`]: MCP tool servers (JSONPlaceholder users, paper search)
//! - [`web`]: HTTP endpoint
//! - [`models`]: Core data structures (SearchResultHandle, Document, etc.)
//! - [`utils`]: HTTP client and PDF text extraction
//! - [`config`]: Configuration management

pub mod config;
pub mod graphs;
pub mod llm;
pub mod mcp;
pub mod models;
pub mod sources;
pub mod tools;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use config::Settings;
pub use graphs::{ArticleSearchGraph, ArticleSearchState, ChatbotGraph};
pub use models::{Document, SearchResultHandle, StructuredQuery};
pub use sources::{ArxivSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
