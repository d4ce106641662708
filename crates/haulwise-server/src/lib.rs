//! Haulwise site server.
//!
//! Hosts the demo-request intake endpoint at `/api/demo-request`, a health
//! check at `/api/health`, and optionally the prebuilt marketing site.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
