//! Snapshot Publishing Module
//!
//! Exposes the crawler's latest graph to viewers.
//!
//! ## Surfaces
//! - **`SharedSnapshot`**: in-memory copy served over HTTP.
//! - **`FilePublisher`**: atomically replaced `data.json` for static serving.
//! - **HTTP**: `/` viewer page, `/data.json` document, `/health` counters.

pub mod handlers;
pub mod publisher;
