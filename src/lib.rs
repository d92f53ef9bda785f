//! Persistent records for subscribed feeds and the posts they publish.
//!
//! Records are written through repositories that run each record's
//! pre-save hook ([`domain::Document::prepare`]) before validating and
//! writing it, so `updated` stamps and post signatures are always current.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod services;
pub mod storage;

pub use config::{Config, ConnectOptions, DatabaseSettings};
pub use domain::{Document, Feed, FeedType, Post};
pub use errors::{BaleenError, BaleenResult, ValidationError};
pub use storage::connect;
