//! Service traits the cache and aggregator consume.
//!
//! Narrow seams over the REST client so every network interaction can be
//! faked in tests.

use async_trait::async_trait;
use common::{Account, Error, Organization};
use platform_client::PlatformRestClient;

/// The organization directory: one call, the full list.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Organization>, Error>;
}

/// Per-organization account listing. Failures are independent per call.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn fetch_for_organization(&self, org_id: &str) -> Result<Vec<Account>, Error>;
}

#[async_trait]
impl DirectoryService for PlatformRestClient {
    async fn fetch_all(&self) -> Result<Vec<Organization>, Error> {
        self.list_organizations().await
    }
}

#[async_trait]
impl AccountService for PlatformRestClient {
    async fn fetch_for_organization(&self, org_id: &str) -> Result<Vec<Account>, Error> {
        self.list_accounts(org_id).await
    }
}
