//! Data models for waste-tracking entities.
//!
//! This module contains all the data structures exchanged with the backend:
//!
//! - `User`, `UserStats`, `Role`: the authenticated user and their stats
//! - `Account`, `NewAccount`: participant accounts with KYC status
//! - `Entry`, `NewEntry`, `Quantities`: supply/transfer/return transactions
//! - `Product`: the monitored product catalog
//! - `ReportStats`, `Insights`: aggregate reporting
//! - `RegistrationForm`: onboarding form with client-side validation

pub mod account;
pub mod entry;
pub mod product;
pub mod registration;
pub mod report;
pub mod user;
pub mod validation;

pub use account::{Account, AccountType, KycStatus, NewAccount};
pub use entry::{Entry, NewEntry, Quantities, QuantityInput, TransactionType};
pub use product::Product;
pub use registration::{Attachment, RegistrationForm};
pub use report::{Insights, ReportStats};
pub use user::{Role, User, UserStats};
pub use validation::{ValidationError, MIN_PASSWORD_LENGTH};
