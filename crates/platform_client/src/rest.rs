//! REST client for the payments backend.
//!
//! Covers the three endpoint families the console touches: organizations,
//! accounts, and payouts. All methods are rate-limited; a bearer token is
//! attached when configured.

use common::{
    Account, CreateAccountRequest, CreateOrganizationRequest, Error, Organization, Payout,
    PayoutRequest, PayoutSearchRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::rate_limit::RateLimiter;

/// Async REST client for the payments platform backend.
#[derive(Debug, Clone)]
pub struct PlatformRestClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    limiter: RateLimiter,
}

impl PlatformRestClient {
    /// Create a new REST client against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_limits(base_url, api_key, 15, 20, 10)
    }

    /// Create with explicit timeout and rate limits.
    pub fn with_limits(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
        reads_per_sec: u32,
        writes_per_sec: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let api_key = api_key.filter(|k| !k.trim().is_empty());

        Self {
            client,
            base_url,
            api_key,
            limiter: RateLimiter::with_limits(reads_per_sec, writes_per_sec),
        }
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when one is configured.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Send a request and decode the JSON body, mapping non-2xx statuses to
    /// typed errors.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status == 429 {
            return Err(Error::RateLimited {
                retry_after_ms: 1000,
            });
        }
        if status != 200 && status != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        resp.json().await.map_err(|e| Error::Http(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.limiter.wait_read().await;
        debug!("GET {}", path);
        self.dispatch(self.authorize(self.client.get(self.url(path))))
            .await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.limiter.wait_write().await;
        debug!("POST {}", path);
        self.dispatch(self.authorize(self.client.post(self.url(path))).json(body))
            .await
    }

    // ── Organizations ─────────────────────────────────────────────────

    /// Fetch the full organization list.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        let orgs: Vec<Organization> = self.get_json("/organizations").await?;
        debug!("Fetched {} organizations", orgs.len());
        Ok(orgs)
    }

    /// Fetch a single organization by id.
    pub async fn get_organization(&self, org_id: &str) -> Result<Organization, Error> {
        self.get_json(&format!("/organizations/{}", org_id)).await
    }

    /// Create an organization.
    pub async fn create_organization(
        &self,
        req: &CreateOrganizationRequest,
    ) -> Result<Organization, Error> {
        let org: Organization = self.post_json("/organizations", req).await?;
        debug!("Created organization {} ({})", org.id, org.org_type);
        Ok(org)
    }

    // ── Accounts ──────────────────────────────────────────────────────

    /// Fetch all accounts belonging to an organization.
    pub async fn list_accounts(&self, org_id: &str) -> Result<Vec<Account>, Error> {
        let accounts: Vec<Account> = self.get_json(&format!("/accounts/{}", org_id)).await?;
        debug!("Fetched {} accounts for {}", accounts.len(), org_id);
        Ok(accounts)
    }

    /// Fetch a single account.
    pub async fn get_account(&self, org_id: &str, account_id: &str) -> Result<Account, Error> {
        self.get_json(&format!("/accounts/{}/{}", org_id, account_id))
            .await
    }

    /// Create an account under an organization.
    pub async fn create_account(
        &self,
        org_id: &str,
        req: &CreateAccountRequest,
    ) -> Result<Account, Error> {
        let account: Account = self
            .post_json(&format!("/accounts/{}", org_id), req)
            .await?;
        debug!("Created account {} under {}", account.id, org_id);
        Ok(account)
    }

    // ── Payouts ───────────────────────────────────────────────────────

    /// Search payouts for an account. The backend expects the filter as a
    /// POST body even though this is a read.
    pub async fn search_payouts(
        &self,
        org_id: &str,
        account_id: &str,
        req: &PayoutSearchRequest,
    ) -> Result<Vec<Payout>, Error> {
        let payouts: Vec<Payout> = self
            .post_json(&format!("/payouts/{}/{}", org_id, account_id), req)
            .await?;
        debug!(
            "Fetched {} payouts for {}/{}",
            payouts.len(),
            org_id,
            account_id
        );
        Ok(payouts)
    }

    /// Create a payout request (does not execute it).
    pub async fn create_payout(
        &self,
        org_id: &str,
        req: &PayoutRequest,
    ) -> Result<Payout, Error> {
        let payout: Payout = self
            .post_json(&format!("/payouts/create/{}", org_id), req)
            .await?;
        debug!("Created payout {} for {}", payout.id, org_id);
        Ok(payout)
    }

    /// Execute a previously created payout request.
    pub async fn execute_payout(
        &self,
        org_id: &str,
        account_id: &str,
        payout_id: &str,
    ) -> Result<Payout, Error> {
        let payout: Payout = self
            .post_json(
                &format!("/payouts/{}/{}/{}", org_id, account_id, payout_id),
                &serde_json::json!({}),
            )
            .await?;
        debug!("Executed payout {} → {}", payout_id, payout.status);
        Ok(payout)
    }
}
