//! Organization directory cache.
//!
//! Keeps a small persisted snapshot of organization summaries so the
//! console doesn't refetch the full directory on every navigation. One
//! envelope, one slot, two-minute freshness window.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use common::{Error, Organization};

use crate::clock::Clock;
use crate::services::DirectoryService;
use crate::store::KeyValueStore;

/// Storage slot holding the serialized envelope.
pub const ORG_IDS_KEY: &str = "orgIds";

/// How long a snapshot stays fresh.
pub const DEFAULT_FRESHNESS_MS: i64 = 2 * 60 * 1000;

/// Minimal projection of an organization used for cache and navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSummary {
    pub id: String,
    pub name: String,
    pub active: bool,
}

impl OrgSummary {
    /// Derive a summary from a raw directory record.
    ///
    /// `active` means the organization has accepted the terms of service
    /// and cleared KYC. `name` falls back to "first last" for individuals
    /// without a display name.
    pub fn from_organization(org: &Organization) -> Self {
        let name = match &org.name {
            Some(name) => name.clone(),
            None => format!(
                "{} {}",
                org.first_name.as_deref().unwrap_or_default(),
                org.last_name.as_deref().unwrap_or_default()
            ),
        };

        Self {
            id: org.id.clone(),
            name,
            active: org.tos_status == "ACCEPTED" && org.kyc_status.kind == "approved",
        }
    }
}

/// The persisted unit: snapshot plus its creation time in epoch millis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub data: Vec<OrgSummary>,
    pub timestamp: i64,
}

impl CacheEnvelope {
    pub fn is_fresh(&self, now_ms: i64, freshness_ms: i64) -> bool {
        now_ms - self.timestamp <= freshness_ms
    }
}

/// Time-bounded directory snapshot backed by a single persisted slot.
///
/// Takes no lock: two callers that both see a stale envelope will both
/// fetch and both write, last writer wins. Both still get correct data,
/// so the race is accepted rather than serialized away.
pub struct OrgDirectoryCache {
    directory: Arc<dyn DirectoryService>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    freshness_ms: i64,
}

impl OrgDirectoryCache {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            store,
            clock,
            freshness_ms: DEFAULT_FRESHNESS_MS,
        }
    }

    /// Override the freshness window (milliseconds).
    pub fn with_freshness(mut self, freshness_ms: i64) -> Self {
        self.freshness_ms = freshness_ms;
        self
    }

    /// Return the cached organization summaries, refetching from the
    /// directory when the snapshot is absent, unreadable, or stale.
    ///
    /// A directory fetch failure is the only error path; anything wrong
    /// with the stored envelope just downgrades to a cache miss.
    pub async fn get_organization_ids(&self) -> Result<Vec<OrgSummary>, Error> {
        let now = self.clock.now_ms();

        match self.store.get(ORG_IDS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<CacheEnvelope>(&raw) {
                Ok(envelope) if envelope.is_fresh(now, self.freshness_ms) => {
                    debug!("Directory cache hit ({} orgs)", envelope.data.len());
                    return Ok(envelope.data);
                }
                Ok(envelope) => {
                    debug!(
                        "Directory cache stale ({}ms old), refetching",
                        now - envelope.timestamp
                    );
                }
                Err(e) => {
                    warn!("Invalid cache format, ignoring cache: {}", e);
                }
            },
            Ok(None) => debug!("Directory cache empty, fetching"),
            Err(e) => warn!("Directory cache unreadable, ignoring cache: {}", e),
        }

        let orgs = self.directory.fetch_all().await?;
        let summaries: Vec<OrgSummary> = orgs.iter().map(OrgSummary::from_organization).collect();

        let envelope = CacheEnvelope {
            data: summaries.clone(),
            timestamp: now,
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                if let Err(e) = self.store.set(ORG_IDS_KEY, &raw) {
                    // The fetch already succeeded; a cache write failure
                    // only costs the next caller a refetch.
                    warn!("Failed to persist directory cache: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize directory cache: {}", e),
        }

        debug!("Directory cache refreshed ({} orgs)", summaries.len());
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use common::KycStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeDirectory {
        orgs: Vec<Organization>,
        calls: AtomicUsize,
        fail: bool,
        delay_ms: u64,
    }

    impl FakeDirectory {
        fn returning(orgs: Vec<Organization>) -> Self {
            Self {
                orgs,
                calls: AtomicUsize::new(0),
                fail: false,
                delay_ms: 0,
            }
        }

        fn failing() -> Self {
            Self {
                orgs: Vec::new(),
                calls: AtomicUsize::new(0),
                fail: true,
                delay_ms: 0,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DirectoryService for FakeDirectory {
        async fn fetch_all(&self) -> Result<Vec<Organization>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.fail {
                return Err(Error::Http("connection refused".into()));
            }
            Ok(self.orgs.clone())
        }
    }

    fn org(id: &str, name: Option<&str>, tos: &str, kyc: &str) -> Organization {
        Organization {
            id: id.to_string(),
            name: name.map(String::from),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            org_type: "individual".into(),
            created_at: None,
            updated_at: None,
            tos_status: tos.to_string(),
            kyc_status: KycStatus {
                kind: kyc.to_string(),
                kyc_url: None,
            },
            currency_capabilities: Vec::new(),
        }
    }

    fn cache_with(
        directory: Arc<FakeDirectory>,
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
    ) -> OrgDirectoryCache {
        OrgDirectoryCache::new(directory, store, clock)
    }

    fn seed_envelope(store: &MemoryStore, summaries: Vec<OrgSummary>, timestamp: i64) {
        let raw = serde_json::to_string(&CacheEnvelope {
            data: summaries,
            timestamp,
        })
        .unwrap();
        store.set(ORG_IDS_KEY, &raw).unwrap();
    }

    #[tokio::test]
    async fn fresh_envelope_is_returned_without_fetching() {
        let store = Arc::new(MemoryStore::new());
        let summary = OrgSummary {
            id: "org-1".into(),
            name: "Acme".into(),
            active: true,
        };
        seed_envelope(&store, vec![summary.clone()], 1_000_000);

        let directory = Arc::new(FakeDirectory::returning(vec![]));
        let clock = Arc::new(FixedClock::new(1_000_000 + 120_000));
        let cache = cache_with(directory.clone(), store, clock);

        let got = cache.get_organization_ids().await.unwrap();
        assert_eq!(got, vec![summary]);
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn stale_envelope_triggers_one_fetch_and_overwrite() {
        let store = Arc::new(MemoryStore::new());
        seed_envelope(
            &store,
            vec![OrgSummary {
                id: "old".into(),
                name: "Old".into(),
                active: false,
            }],
            1_000_000,
        );

        let directory = Arc::new(FakeDirectory::returning(vec![org(
            "org-2",
            Some("Fresh Co"),
            "ACCEPTED",
            "approved",
        )]));
        let now = 1_000_000 + 120_001;
        let clock = Arc::new(FixedClock::new(now));
        let cache = cache_with(directory.clone(), store.clone(), clock);

        let got = cache.get_organization_ids().await.unwrap();
        assert_eq!(directory.call_count(), 1);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "org-2");

        let raw = store.get(ORG_IDS_KEY).unwrap().unwrap();
        let envelope: CacheEnvelope = serde_json::from_str(&raw).unwrap();
        assert_eq!(envelope.timestamp, now);
        assert_eq!(envelope.data, got);
    }

    #[tokio::test]
    async fn malformed_envelope_degrades_to_fetch() {
        let store = Arc::new(MemoryStore::new());
        store.set(ORG_IDS_KEY, "not json at all").unwrap();

        let directory = Arc::new(FakeDirectory::returning(vec![org(
            "org-3",
            Some("Parsed"),
            "ACCEPTED",
            "approved",
        )]));
        let cache = cache_with(
            directory.clone(),
            store,
            Arc::new(FixedClock::new(42)),
        );

        let got = cache.get_organization_ids().await.unwrap();
        assert_eq!(directory.call_count(), 1);
        assert_eq!(got[0].id, "org-3");
    }

    #[tokio::test]
    async fn missing_envelope_fetches() {
        let directory = Arc::new(FakeDirectory::returning(vec![]));
        let cache = cache_with(
            directory.clone(),
            Arc::new(MemoryStore::new()),
            Arc::new(FixedClock::new(0)),
        );

        assert!(cache.get_organization_ids().await.unwrap().is_empty());
        assert_eq!(directory.call_count(), 1);
    }

    #[tokio::test]
    async fn directory_failure_propagates_and_preserves_envelope() {
        let store = Arc::new(MemoryStore::new());
        seed_envelope(
            &store,
            vec![OrgSummary {
                id: "kept".into(),
                name: "Kept".into(),
                active: true,
            }],
            0,
        );
        let before = store.get(ORG_IDS_KEY).unwrap();

        let cache = cache_with(
            Arc::new(FakeDirectory::failing()),
            store.clone(),
            Arc::new(FixedClock::new(500_000)),
        );

        assert!(cache.get_organization_ids().await.is_err());
        assert_eq!(store.get(ORG_IDS_KEY).unwrap(), before);
    }

    #[tokio::test]
    async fn name_falls_back_to_first_and_last() {
        let directory = Arc::new(FakeDirectory::returning(vec![org(
            "org-4",
            None,
            "ACCEPTED",
            "approved",
        )]));
        let cache = cache_with(
            directory,
            Arc::new(MemoryStore::new()),
            Arc::new(FixedClock::new(0)),
        );

        let got = cache.get_organization_ids().await.unwrap();
        assert_eq!(got[0].name, "Ada Lovelace");
    }

    #[test]
    fn active_requires_accepted_tos_and_approved_kyc() {
        let cases = [
            ("ACCEPTED", "approved", true),
            ("ACCEPTED", "pending", false),
            ("PENDING", "approved", false),
            ("PENDING", "pending", false),
        ];
        for (tos, kyc, expected) in cases {
            let summary = OrgSummary::from_organization(&org("x", Some("X"), tos, kyc));
            assert_eq!(summary.active, expected, "tos={} kyc={}", tos, kyc);
        }
    }

    // The stale-refresh race is accepted behavior: two callers inside the
    // stale window each fetch and each write; last writer wins and both
    // get correct data.
    #[tokio::test]
    async fn two_stale_callers_both_fetch_last_write_wins() {
        let store = Arc::new(MemoryStore::new());
        let directory = Arc::new(FakeDirectory {
            orgs: vec![org("org-5", Some("Raced"), "ACCEPTED", "approved")],
            calls: AtomicUsize::new(0),
            fail: false,
            delay_ms: 20,
        });
        let clock = Arc::new(FixedClock::new(0));
        let cache = OrgDirectoryCache::new(directory.clone(), store.clone(), clock);

        let (a, b) = tokio::join!(cache.get_organization_ids(), cache.get_organization_ids());
        let a = a.unwrap();
        let b = b.unwrap();

        assert_eq!(directory.call_count(), 2);
        assert_eq!(a, b);

        let raw = store.get(ORG_IDS_KEY).unwrap().unwrap();
        let envelope: CacheEnvelope = serde_json::from_str(&raw).unwrap();
        assert_eq!(envelope.data, a);
    }

    #[tokio::test]
    async fn custom_freshness_window_is_honored() {
        let store = Arc::new(MemoryStore::new());
        seed_envelope(&store, vec![], 0);

        let directory = Arc::new(FakeDirectory::returning(vec![]));
        let cache = cache_with(
            directory.clone(),
            store,
            Arc::new(FixedClock::new(4_999)),
        )
        .with_freshness(5_000);

        cache.get_organization_ids().await.unwrap();
        assert_eq!(directory.call_count(), 0);
    }
}
