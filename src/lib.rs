// ABOUTME: Library root for convoy - exposes the deployment controller and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod app;
pub mod clock;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod observer;
pub mod output;
pub mod query;
pub mod types;
