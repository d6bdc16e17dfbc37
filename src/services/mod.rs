//! External service interactions
//!
//! - Analytics API client
//! - Background fetch execution
//! - HTML summarizing for the terminal
//! - Browser launching

pub mod api;
pub mod browser;
pub mod fetch_runner;
pub mod html;

pub use api::ApiClient;
pub use browser::BrowserTarget;
pub use fetch_runner::{FetchOutcome, FetchRunner};
