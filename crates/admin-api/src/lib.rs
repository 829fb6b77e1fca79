//! Admin JSON API for the Switchboard voice platform.
//!
//! Exposes the back-office operations (subscription plans, users, API keys,
//! voices, call sessions, conversation turns) as HTTP endpoints over the
//! SQLite persistence layer.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
