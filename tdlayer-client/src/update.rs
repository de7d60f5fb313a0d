//! Pull-style access to a client's decoded objects.

use tdlayer_types::enums::Object;
use tokio::sync::mpsc;

// ─── UpdateStream ─────────────────────────────────────────────────────────────

/// Asynchronous stream of every object delivered to one client.
///
/// Created by [`crate::Client::updates`]. Replies consumed by a correlated
/// request do not appear here. Objects are yielded in arrival order; the
/// stream ends when the client is unregistered or closed.
///
/// # Example
/// ```rust,no_run
/// # async fn f(client: tdlayer_client::Client) {
/// use tdlayer_types::enums::Object;
///
/// let mut updates = client.updates();
/// while let Some(obj) = updates.next().await {
///     if let Object::UpdateNewMessage(u) = obj {
///         println!("{:?}", u.message.text());
///     }
/// }
/// # }
/// ```
pub struct UpdateStream {
    rx: mpsc::UnboundedReceiver<Object>,
}

impl UpdateStream {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Object>) -> Self {
        Self { rx }
    }

    /// Wait for the next object. Returns `None` when the client has stopped.
    pub async fn next(&mut self) -> Option<Object> {
        self.rx.recv().await
    }

    /// Wait for the next object of shape `T`, skipping everything else.
    pub async fn next_of<T: TryFrom<Object>>(&mut self) -> Option<T> {
        loop {
            if let Ok(v) = T::try_from(self.next().await?) {
                return Some(v);
            }
        }
    }

    /// Take an object if one is already queued.
    pub fn try_next(&mut self) -> Option<Object> {
        self.rx.try_recv().ok()
    }
}
