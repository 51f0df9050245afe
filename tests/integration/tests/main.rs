//! End-to-end pipeline tests.
//!
//! These tests wire real clients, extractor chains and the caching
//! decorator together over the in-memory session store, with provider
//! round trips stubbed out.

mod common;
mod caching_pipeline;
mod oauth_pipeline;
mod protocol_chain;
