//! Organization data layer for the console.
//!
//! Two pieces: a time-bounded persisted cache of organization summaries
//! (so views don't refetch the directory on every navigation) and a
//! fan-out aggregator that loads account lists for many organizations
//! concurrently. Both talk to the backend through narrow service traits
//! so tests can run against fakes.

pub mod aggregate;
pub mod cache;
pub mod clock;
pub mod services;
pub mod store;

pub use aggregate::AccountAggregator;
pub use cache::{CacheEnvelope, OrgDirectoryCache, OrgSummary, ORG_IDS_KEY};
pub use clock::{Clock, FixedClock, SystemClock};
pub use services::{AccountService, DirectoryService};
pub use store::{FileStore, KeyValueStore, MemoryStore};
