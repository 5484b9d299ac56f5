//! Fan-out account aggregation.
//!
//! Issues one account-list request per organization, all in flight at
//! once, and joins them into a single map. One failed organization never
//! sinks the batch — it just shows up with an empty account list.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, warn};

use common::{Account, Error};

use crate::services::AccountService;

/// Concurrent account loader over an [`AccountService`].
#[derive(Clone)]
pub struct AccountAggregator {
    accounts: Arc<dyn AccountService>,
}

impl AccountAggregator {
    pub fn new(accounts: Arc<dyn AccountService>) -> Self {
        Self { accounts }
    }

    /// Load the account lists for every given organization id.
    ///
    /// All fetches start immediately; the map is produced only once every
    /// one of them has settled. A per-organization failure is logged and
    /// recorded as an empty list. Duplicated ids each fire their own
    /// request but collapse to a single map entry (last settled wins).
    ///
    /// The only `Err` is a failure of the join machinery itself; no
    /// partial map is returned in that case.
    pub async fn load_accounts_for_organizations(
        &self,
        org_ids: &[String],
    ) -> Result<HashMap<String, Vec<Account>>, Error> {
        let mut grouped = HashMap::with_capacity(org_ids.len());
        if org_ids.is_empty() {
            return Ok(grouped);
        }

        let mut inflight = JoinSet::new();
        for org_id in org_ids {
            let service = Arc::clone(&self.accounts);
            let org_id = org_id.clone();
            inflight.spawn(async move {
                let fetched = service.fetch_for_organization(&org_id).await;
                (org_id, fetched)
            });
        }

        while let Some(settled) = inflight.join_next().await {
            let (org_id, fetched) = settled.map_err(|e| {
                error!("Account aggregation join failed: {}", e);
                Error::Join(e.to_string())
            })?;

            match fetched {
                Ok(accounts) => {
                    grouped.insert(org_id, accounts);
                }
                Err(e) => {
                    warn!("Failed to fetch accounts for {}: {}", org_id, e);
                    grouped.insert(org_id, Vec::new());
                }
            }
        }

        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::AccountDetails;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            name: id.to_string(),
            status: "ACTIVE".into(),
            is_api_enabled: false,
            created_at: None,
            updated_at: None,
            account_details: AccountDetails::default(),
        }
    }

    struct FakeAccounts {
        data: HashMap<String, Vec<Account>>,
        fail_ids: HashSet<String>,
        calls: AtomicUsize,
        delay_ms: u64,
    }

    impl FakeAccounts {
        fn new(data: HashMap<String, Vec<Account>>, fail_ids: HashSet<String>) -> Self {
            Self {
                data,
                fail_ids,
                calls: AtomicUsize::new(0),
                delay_ms: 0,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AccountService for FakeAccounts {
        async fn fetch_for_organization(&self, org_id: &str) -> Result<Vec<Account>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.fail_ids.contains(org_id) {
                return Err(Error::Api {
                    status: 500,
                    message: format!("accounts unavailable for {}", org_id),
                });
            }
            Ok(self.data.get(org_id).cloned().unwrap_or_default())
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_input_returns_empty_map_without_calls() {
        let service = Arc::new(FakeAccounts::new(HashMap::new(), HashSet::new()));
        let aggregator = AccountAggregator::new(service.clone());

        let grouped = aggregator.load_accounts_for_organizations(&[]).await.unwrap();
        assert!(grouped.is_empty());
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn one_failure_degrades_to_empty_list() {
        let mut data = HashMap::new();
        data.insert("a".to_string(), vec![account("x")]);
        data.insert("c".to_string(), vec![account("y"), account("z")]);
        let service = Arc::new(FakeAccounts::new(
            data,
            HashSet::from(["b".to_string()]),
        ));
        let aggregator = AccountAggregator::new(service);

        let grouped = aggregator
            .load_accounts_for_organizations(&ids(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped["a"].len(), 1);
        assert!(grouped["b"].is_empty());
        assert_eq!(grouped["c"].len(), 2);
    }

    #[tokio::test]
    async fn every_requested_id_gets_a_key_even_when_all_fail() {
        let service = Arc::new(FakeAccounts::new(
            HashMap::new(),
            HashSet::from(["a".to_string(), "b".to_string()]),
        ));
        let aggregator = AccountAggregator::new(service);

        let grouped = aggregator
            .load_accounts_for_organizations(&ids(&["a", "b"]))
            .await
            .unwrap();

        assert_eq!(grouped.len(), 2);
        assert!(grouped.values().all(Vec::is_empty));
    }

    // Which duplicate settles last is not guaranteed; the contract is
    // only "one entry per id, each duplicate fetched independently".
    #[tokio::test]
    async fn duplicate_ids_collapse_to_one_entry() {
        let mut data = HashMap::new();
        data.insert("a".to_string(), vec![account("x")]);
        let service = Arc::new(FakeAccounts::new(data, HashSet::new()));
        let aggregator = AccountAggregator::new(service.clone());

        let grouped = aggregator
            .load_accounts_for_organizations(&ids(&["a", "a"]))
            .await
            .unwrap();

        assert_eq!(service.call_count(), 2);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["a"].len(), 1);
    }

    #[tokio::test]
    async fn fetches_overlap_rather_than_run_serially() {
        let mut data = HashMap::new();
        for id in ["a", "b", "c", "d"] {
            data.insert(id.to_string(), vec![account(id)]);
        }
        let service = Arc::new(FakeAccounts {
            data,
            fail_ids: HashSet::new(),
            calls: AtomicUsize::new(0),
            delay_ms: 50,
        });
        let aggregator = AccountAggregator::new(service);

        let started = std::time::Instant::now();
        let grouped = aggregator
            .load_accounts_for_organizations(&ids(&["a", "b", "c", "d"]))
            .await
            .unwrap();

        assert_eq!(grouped.len(), 4);
        // Four serialized 50ms fetches would need 200ms.
        assert!(started.elapsed() < Duration::from_millis(150));
    }
}
