//! Client id → inbound queue map.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc;

use crate::engine::ClientId;
use crate::errors::RegistryError;
use crate::RawEvent;

/// Sending half of a client's inbound queue.
pub type QueueSender = mpsc::UnboundedSender<RawEvent>;
/// Receiving half of a client's inbound queue, read only by that client's reader.
pub type QueueReceiver = mpsc::UnboundedReceiver<RawEvent>;

/// Maps every live client id to its inbound queue.
///
/// The registry holds the only long-lived sender of each queue, so removing an
/// entry closes the queue once in-flight deliveries finish. Entries are
/// inserted fully built under the write lock; a lookup never sees a partial one.
#[derive(Default)]
pub struct ClientRegistry {
    slots: RwLock<HashMap<ClientId, QueueSender>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the queue for `id` and return its receiving half.
    pub fn register(&self, id: ClientId) -> Result<QueueReceiver, RegistryError> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        slots.insert(id, tx);
        Ok(rx)
    }

    /// The queue for `id`, or `None` if no such client is registered.
    pub fn lookup(&self, id: ClientId) -> Option<QueueSender> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).get(&id).cloned()
    }

    /// Remove `id` and close its queue.
    pub fn unregister(&self, id: ClientId) -> Result<(), RegistryError> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(drop)
            .ok_or(RegistryError::NotRegistered(id))
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered ids, in no particular order.
    pub fn ids(&self) -> Vec<ClientId> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn double_register_is_rejected() {
        let r = ClientRegistry::new();
        let _rx = r.register(1).unwrap();
        assert_eq!(r.register(1).unwrap_err(), RegistryError::AlreadyRegistered(1));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn unregister_unknown_is_rejected() {
        let r = ClientRegistry::new();
        assert_eq!(r.unregister(9).unwrap_err(), RegistryError::NotRegistered(9));
    }

    #[test]
    fn lookup_reaches_the_registered_queue() {
        let r = ClientRegistry::new();
        let mut rx = r.register(3).unwrap();
        r.lookup(3).unwrap().send(Arc::from("{}")).unwrap();
        assert_eq!(&*rx.try_recv().unwrap(), "{}");
        assert!(r.lookup(4).is_none());
    }

    #[test]
    fn unregister_closes_the_queue() {
        let r = ClientRegistry::new();
        let mut rx = r.register(3).unwrap();
        r.unregister(3).unwrap();
        assert!(rx.try_recv().is_err());
        assert!(rx.is_closed());
        assert!(!r.contains(3));
    }

    #[test]
    fn id_can_be_reused_after_unregister() {
        let r = ClientRegistry::new();
        let _old = r.register(5).unwrap();
        r.unregister(5).unwrap();
        assert!(r.register(5).is_ok());
    }
}
