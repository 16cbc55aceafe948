//! Process-wide cache of model clients keyed by system prompt text.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use mentorchat_types::error::ClientConstructionError;

use super::client::{ClientFactory, ModelClient};

type Slot = Arc<OnceCell<Arc<ModelClient>>>;

/// Memoizes [`ModelClient`] construction by exact prompt text.
///
/// Concurrent callers asking for the same prompt wait on one construction.
/// A failed construction leaves the slot empty so the next caller retries.
/// Entries are never evicted.
pub struct ClientCache {
    factory: Arc<dyn ClientFactory>,
    slots: DashMap<String, Slot>,
}

impl ClientCache {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            slots: DashMap::new(),
        }
    }

    /// Return the client for `system_prompt`, building it on first use.
    pub async fn get_or_build(
        &self,
        system_prompt: &str,
    ) -> Result<Arc<ModelClient>, ClientConstructionError> {
        // Clone the slot out so no map shard lock is held across the await.
        let slot: Slot = self
            .slots
            .entry(system_prompt.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        if let Some(client) = slot.get() {
            debug!(prompt_len = system_prompt.len(), "Model client cache hit");
            return Ok(Arc::clone(client));
        }

        let result = slot
            .get_or_try_init(|| async {
                debug!(
                    prompt_len = system_prompt.len(),
                    "Building model client for new system prompt"
                );
                self.factory.build(system_prompt).map(Arc::new)
            })
            .await;

        match result {
            Ok(client) => Ok(Arc::clone(client)),
            Err(e) => {
                // Drop the empty slot so rejected prompts do not accumulate.
                self.slots
                    .remove_if(system_prompt, |_, slot| !slot.initialized());
                Err(e)
            }
        }
    }

    /// Whether a client for `system_prompt` has been built.
    pub fn contains(&self, system_prompt: &str) -> bool {
        self.slots
            .get(system_prompt)
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of built clients.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::CountingFactory;

    #[tokio::test]
    async fn test_builds_once_per_prompt() {
        let factory = CountingFactory::new();
        let cache = ClientCache::new(factory.clone());

        let a = cache.get_or_build("prompt A").await.unwrap();
        let b = cache.get_or_build("prompt A").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.builds(), 1);

        let c = cache.get_or_build("prompt B").await.unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.system_prompt(), "prompt B");
        assert_eq!(factory.builds(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_exact_text() {
        let factory = CountingFactory::new();
        let cache = ClientCache::new(factory.clone());

        cache.get_or_build("prompt").await.unwrap();
        cache.get_or_build("prompt ").await.unwrap();
        assert_eq!(factory.builds(), 2);
    }

    #[tokio::test]
    async fn test_failed_build_is_not_cached() {
        let factory = CountingFactory::new();
        let cache = ClientCache::new(factory.clone());

        factory.set_refuse(true);
        let err = cache.get_or_build("prompt").await.err().unwrap();
        assert!(matches!(err, ClientConstructionError::InvalidConfig(_)));
        assert!(!cache.contains("prompt"));
        assert!(cache.is_empty());
        assert!(cache.slots.is_empty());

        factory.set_refuse(false);
        cache.get_or_build("prompt").await.unwrap();
        assert!(cache.contains("prompt"));
        assert_eq!(factory.builds(), 1);
    }

    #[tokio::test]
    async fn test_rejected_prompts_leave_no_slots() {
        let factory = CountingFactory::new();
        let cache = ClientCache::new(factory.clone());
        cache.get_or_build("kept").await.unwrap();

        factory.set_refuse(true);
        for i in 0..5 {
            assert!(cache.get_or_build(&format!("rejected {i}")).await.is_err());
        }
        assert_eq!(cache.slots.len(), 1);
        assert!(cache.contains("kept"));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_build() {
        let factory = CountingFactory::new();
        let cache = Arc::new(ClientCache::new(factory.clone()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.get_or_build("shared").await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(factory.builds(), 1);
    }
}
