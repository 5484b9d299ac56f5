//! Payments-platform API client library.
//!
//! Thin async REST wrapper over the backend's organization, account, and
//! payout endpoints.

pub mod rate_limit;
pub mod rest;

pub use rate_limit::RateLimiter;
pub use rest::PlatformRestClient;
