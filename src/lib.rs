//! Client for the validation backend's submission API: history lookup, content
//! evaluation and final data submission.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod timestamp;

pub use client::SubmissionClient;
pub use config::Config;
pub use error::SubmissionError;
