//! Request handlers, grouped by API surface.

pub mod admin;
pub mod assets;
pub mod auth;
pub mod bitcoin;
pub mod health;
pub mod portfolio;
pub mod trade;
