//! Domain library for the Harbor Mail direct-mail service.
//!
//! The crate exposes the two campaign calculators (pricing and audience
//! sizing) together with the thin administration layer that surrounds them:
//! campaign status updates, exclusivity territories, fulfillment hand-off, user
//! roles and back-office reporting.

pub mod audience;
pub mod campaigns;
pub mod config;
pub mod context;
pub mod error;
pub mod fulfillment;
pub mod pricing;
pub mod reports;
pub mod telemetry;
pub mod users;
