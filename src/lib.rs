/// Basic application code
pub mod app;
/// Application authorization
pub mod auth;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Cross-origin headers for the browser front end
pub mod cors;
/// Cryptography-related objects
pub mod crypto;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Repositories
pub mod repo;
/// Subscription, broadcast and chat logic
pub mod service;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
/// Outgoing email bodies
pub mod templates;
