//! Firebase Cloud Messaging shared library
//!
//! Provides an FCM HTTP v1 client for relaying push notifications to
//! Android, iOS and Web devices.
//!
//! It handles:
//! - OAuth2 token generation using Google service accounts
//! - Token caching with automatic refresh
//! - Single and per-token batch message delivery
//! - Classification of FCM API errors into a closed taxonomy

pub mod client;
pub mod errors;
pub mod models;

pub use client::FcmClient;
pub use errors::FcmError;
pub use models::{FcmMessage, FcmMessageContent, SendOutcome, ServiceAccountKey};
