//! Core library for the wastetrace client.
//!
//! Implements the session and data-synchronization model shared by every
//! front end:
//!
//! - `auth`: durable session persistence (bearer token + user profile,
//!   cleared together) and remember-me credential storage
//! - `api`: the gateway client - token attachment, response classification,
//!   and typed wrappers for every backend resource
//! - `models`: the domain types exchanged with the backend
//! - `cache`: offline fallback storage for fetched datasets
//! - `config`: base URL resolution and platform directory layout

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
