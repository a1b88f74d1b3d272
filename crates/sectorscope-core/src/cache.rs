//! Keyed, process-lifetime memoization with single-flight initialization.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

/// Outcome published by the caller that ran the computation.
type Outcome<V, E> = Option<Result<Arc<V>, E>>;

enum Slot<V, E> {
    Ready(Arc<V>),
    Pending(watch::Receiver<Outcome<V, E>>),
}

/// Thread-safe memo cache mapping a key to a lazily computed value.
///
/// Concurrent callers asking for the same key share one in-flight computation
/// and all receive its outcome, error included. A failed key is removed once
/// the attempt settles, so a later call retries; entries under other keys are
/// never touched. Successful entries live until invalidated.
pub struct MemoCache<K, V, E> {
    slots: Arc<Mutex<HashMap<K, Slot<V, E>>>>,
}

impl<K, V, E> Clone for MemoCache<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<K, V, E> Default for MemoCache<K, V, E> {
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V, E> Debug for MemoCache<K, V, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache").finish_non_exhaustive()
    }
}

impl<K, V, E> MemoCache<K, V, E>
where
    K: Eq + Hash + Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, computing it with `init` on a miss.
    ///
    /// While one caller runs `init`, other callers for the same key wait for
    /// its outcome instead of starting their own. On error nothing is stored
    /// and every waiter receives a clone of the error.
    pub async fn get_or_try_init<F, Fut>(&self, key: K, init: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        loop {
            let mut slots = self.slots.lock().await;
            let in_flight = match slots.get(&key) {
                Some(Slot::Ready(value)) => return Ok(Arc::clone(value)),
                Some(Slot::Pending(receiver)) if receiver.has_changed().is_ok() => {
                    Some(receiver.clone())
                }
                // Vacant, or the computing caller was dropped mid-flight.
                _ => None,
            };

            let Some(mut waiting) = in_flight else {
                let (sender, receiver) = watch::channel(None);
                slots.insert(key.clone(), Slot::Pending(receiver.clone()));
                drop(slots);
                return self.compute(key, sender, receiver, init).await;
            };
            drop(slots);

            let outcome = match waiting.wait_for(Option::is_some).await {
                Ok(outcome) => outcome.clone(),
                Err(_) => None,
            };
            if let Some(result) = outcome {
                return result;
            }
        }
    }

    async fn compute<F, Fut>(
        &self,
        key: K,
        sender: watch::Sender<Outcome<V, E>>,
        receiver: watch::Receiver<Outcome<V, E>>,
        init: F,
    ) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let result = init().await.map(Arc::new);

        {
            let mut slots = self.slots.lock().await;
            let still_ours = matches!(
                slots.get(&key),
                Some(Slot::Pending(current)) if current.same_channel(&receiver)
            );
            if still_ours {
                match &result {
                    Ok(value) => {
                        slots.insert(key, Slot::Ready(Arc::clone(value)));
                    }
                    Err(_) => {
                        slots.remove(&key);
                    }
                }
            }
        }

        sender.send_replace(Some(result.clone()));
        result
    }

    /// Returns the cached value for `key` without computing it.
    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        let slots = self.slots.lock().await;
        match slots.get(key) {
            Some(Slot::Ready(value)) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Drops the entry for `key`; the next lookup recomputes it.
    pub async fn invalidate(&self, key: &K) {
        let mut slots = self.slots.lock().await;
        slots.remove(key);
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        slots.clear();
    }

    /// Number of keys holding a computed value.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of keys tracked, computed or in flight.
    pub async fn tracked(&self) -> usize {
        self.slots.lock().await.len()
    }
}
