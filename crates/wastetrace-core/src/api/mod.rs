//! REST API client module for the waste-tracking backend.
//!
//! This module provides the `ApiClient` for communicating with the backend
//! under its `/api` base path: authentication, accounts, transaction
//! entries, reports, and the monitored product catalog.
//!
//! The API uses JWT bearer token authentication; the token is read from the
//! session store on every request and the store is invalidated on any
//! auth-rejected response.

pub mod client;
pub mod error;
pub mod response;

pub use client::ApiClient;
pub use error::ApiError;
pub use response::RegisterOutcome;
