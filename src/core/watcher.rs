use crate::core::filter;
use crate::domain::model::{Listing, SeenSet};
use crate::domain::ports::{ConfigProvider, ListingSource, Notifier, SeenStore};

/// Drives the poll → filter → notify → persist cycle over the injected ports,
/// in the same spirit as a pipeline engine: the watcher owns sequencing, the
/// adapters own I/O.
pub struct Watcher<S, N, T, C>
where
    S: ListingSource,
    N: Notifier,
    T: SeenStore,
    C: ConfigProvider,
{
    source: S,
    notifier: N,
    store: T,
    config: C,
}

impl<S, N, T, C> Watcher<S, N, T, C>
where
    S: ListingSource,
    N: Notifier,
    T: SeenStore,
    C: ConfigProvider,
{
    pub fn new(source: S, notifier: N, store: T, config: C) -> Self {
        Self {
            source,
            notifier,
            store,
            config,
        }
    }

    /// Runs one polling cycle. Takes the prior seen-set and returns the
    /// updated one; the set is persisted only when at least one new listing
    /// was notified. No error here is allowed to escape: a failed fetch skips
    /// the cycle, a failed notification or save is logged and the loop moves
    /// on.
    pub async fn run_cycle(&self, mut seen: SeenSet) -> SeenSet {
        tracing::info!("🔍 Checking listings…");

        let listings = match self.source.fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::error!("❌ Error fetching page: {}", e);
                return seen;
            }
        };

        tracing::info!("📌 Found {} listings", listings.len());

        let mut new_count = 0usize;
        for listing in &listings {
            if !filter::is_two_rooms(&listing.title) {
                continue;
            }
            if !filter::within_budget(listing.price, self.config.budget_max()) {
                continue;
            }
            if seen.contains(&listing.url) {
                continue;
            }

            tracing::info!("✨ NEW: {} {}€", listing.title, listing.price);

            // A lost notification is acceptable, a repeated one is not: the
            // listing is marked seen whether or not delivery succeeded.
            if let Err(e) = self.notifier.notify(&alert_message(listing)).await {
                tracing::error!("❌ Telegram error: {}", e);
            }

            seen.insert(listing.url.clone());
            new_count += 1;
        }

        if new_count > 0 {
            match self.store.save(&seen).await {
                Ok(()) => tracing::info!("💾 Saved {} new listings", new_count),
                Err(e) => tracing::error!("❌ Failed to persist seen-set: {}", e),
            }
        } else {
            tracing::info!("➡️ No new listings");
        }

        seen
    }

    /// Loads the persisted seen-set and polls forever. Only external process
    /// termination stops the loop.
    pub async fn run(&self) {
        let mut seen = self.store.load().await;
        tracing::info!("Loaded {} previously seen listings", seen.len());

        loop {
            seen = self.run_cycle(seen).await;
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

fn alert_message(listing: &Listing) -> String {
    format!(
        "🏡 Nouveau T2 détecté !\n\n{}\nPrix : {}€\n\n🔗 {}",
        listing.title, listing.price, listing.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{Result, WatchError};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    struct MockSource {
        listings: Vec<Listing>,
    }

    #[async_trait]
    impl ListingSource for MockSource {
        async fn fetch(&self) -> Result<Vec<Listing>> {
            Ok(self.listings.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ListingSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<Listing>> {
            Err(WatchError::ParseError {
                message: "boom".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(&self, text: &str) -> Result<()> {
            self.sent.lock().await.push(text.to_string());
            if self.fail {
                return Err(WatchError::TelegramError {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockStore {
        saved: Arc<Mutex<Vec<SeenSet>>>,
    }

    struct FailingStore;

    #[async_trait]
    impl SeenStore for FailingStore {
        async fn load(&self) -> SeenSet {
            SeenSet::new()
        }

        async fn save(&self, _seen: &SeenSet) -> Result<()> {
            Err(WatchError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )))
        }
    }

    #[async_trait]
    impl SeenStore for MockStore {
        async fn load(&self) -> SeenSet {
            SeenSet::new()
        }

        async fn save(&self, seen: &SeenSet) -> Result<()> {
            self.saved.lock().await.push(seen.clone());
            Ok(())
        }
    }

    struct MockConfig {
        budget_max: u32,
    }

    impl ConfigProvider for MockConfig {
        fn budget_max(&self) -> u32 {
            self.budget_max
        }

        fn poll_interval(&self) -> Duration {
            Duration::from_secs(120)
        }
    }

    fn listing(title: &str, price: u32, url: &str) -> Listing {
        Listing {
            title: title.to_string(),
            price,
            url: url.to_string(),
        }
    }

    fn watcher(
        listings: Vec<Listing>,
        budget_max: u32,
    ) -> (
        Watcher<MockSource, MockNotifier, MockStore, MockConfig>,
        MockNotifier,
        MockStore,
    ) {
        let notifier = MockNotifier::default();
        let store = MockStore::default();
        let w = Watcher::new(
            MockSource { listings },
            notifier.clone(),
            store.clone(),
            MockConfig { budget_max },
        );
        (w, notifier, store)
    }

    #[tokio::test]
    async fn notifies_only_qualifying_listings() {
        let (w, notifier, store) = watcher(
            vec![
                listing("Bel appartement T2 lumineux", 900, "https://www.inli.fr/a1"),
                listing("Studio cosy", 700, "https://www.inli.fr/a2"),
                listing("Grand T2 standing", 1400, "https://www.inli.fr/a3"),
            ],
            950,
        );

        let seen = w.run_cycle(SeenSet::new()).await;

        let sent = notifier.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Bel appartement T2 lumineux"));
        assert!(sent[0].contains("900€"));
        assert!(sent[0].contains("https://www.inli.fr/a1"));

        assert!(seen.contains("https://www.inli.fr/a1"));
        assert_eq!(seen.len(), 1);
        assert_eq!(store.saved.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn rerun_with_updated_seen_set_is_silent() {
        let listings = vec![
            listing("Bel appartement T2 lumineux", 900, "https://www.inli.fr/a1"),
            listing("Studio cosy", 700, "https://www.inli.fr/a2"),
        ];
        let (w, notifier, store) = watcher(listings, 950);

        let seen = w.run_cycle(SeenSet::new()).await;
        let seen_after = w.run_cycle(seen.clone()).await;

        assert_eq!(notifier.sent.lock().await.len(), 1);
        assert_eq!(seen_after, seen);
        // Second cycle found nothing new, so it must not rewrite the store.
        assert_eq!(store.saved.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn budget_boundary_is_inclusive() {
        let (w, notifier, _) = watcher(
            vec![
                listing("T2 au plafond", 950, "https://www.inli.fr/a4"),
                listing("T2 juste au-dessus", 951, "https://www.inli.fr/a5"),
            ],
            950,
        );

        let seen = w.run_cycle(SeenSet::new()).await;

        assert_eq!(notifier.sent.lock().await.len(), 1);
        assert!(seen.contains("https://www.inli.fr/a4"));
        assert!(!seen.contains("https://www.inli.fr/a5"));
    }

    #[tokio::test]
    async fn fetch_failure_skips_cycle_and_keeps_state() {
        let notifier = MockNotifier::default();
        let store = MockStore::default();
        let w = Watcher::new(
            FailingSource,
            notifier.clone(),
            store.clone(),
            MockConfig { budget_max: 950 },
        );

        let mut prior = SeenSet::new();
        prior.insert("https://www.inli.fr/a1".to_string());

        let seen = w.run_cycle(prior.clone()).await;

        assert_eq!(seen, prior);
        assert!(notifier.sent.lock().await.is_empty());
        assert!(store.saved.lock().await.is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_in_memory_seen_set() {
        let notifier = MockNotifier::default();
        let w = Watcher::new(
            MockSource {
                listings: vec![listing("T2 ensoleillé", 850, "https://www.inli.fr/a7")],
            },
            notifier.clone(),
            FailingStore,
            MockConfig { budget_max: 950 },
        );

        let seen = w.run_cycle(SeenSet::new()).await;

        // The write failure is logged, not fatal; the updated set survives so
        // a later successful cycle re-persists everything.
        assert!(seen.contains("https://www.inli.fr/a7"));
        assert_eq!(notifier.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_notification_still_marks_listing_seen() {
        let store = MockStore::default();
        let notifier = MockNotifier {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        };
        let w = Watcher::new(
            MockSource {
                listings: vec![listing("T2 calme", 800, "https://www.inli.fr/a6")],
            },
            notifier.clone(),
            store.clone(),
            MockConfig { budget_max: 950 },
        );

        let seen = w.run_cycle(SeenSet::new()).await;

        assert!(seen.contains("https://www.inli.fr/a6"));
        assert_eq!(store.saved.lock().await.len(), 1);
    }
}
