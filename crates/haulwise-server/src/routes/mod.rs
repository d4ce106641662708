//! HTTP route handlers for the Haulwise server.
//!
//! - `demo`: Demo-request intake (`/api/demo-request`)
//! - `health`: Liveness and configuration check (`/api/health`)
//! - `site`: Prebuilt marketing site and the JSON 404 fallback

pub mod demo;
pub mod health;
pub mod site;
