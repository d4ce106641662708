//! Core library for Haulwise demo-request intake.
//!
//! Turns an untrusted form submission into a validated [`DemoRequest`],
//! renders the two notification emails, and relays them through a
//! [`haulwise_mail::MailTransport`]. Nothing here touches HTTP or the
//! environment; the server crate owns both.

pub mod error;
pub mod intake;
pub mod model;
pub mod template;
pub mod validate;

pub use error::{IntakeError, ValidationError};
pub use intake::{DemoRequestService, MailAddresses, SendReport};
pub use model::{DemoRequest, DemoRequestPayload};
