//! User-facing transient notifications.
//!
//! # Design
//! `ToastBus` is a cloneable handle to one shared message bus rather than a
//! global: every screen gets a clone, and tests build as many independent
//! buses as they like. Producers call `notify` and never learn what happened
//! to the message. The bus keeps the currently visible toasts keyed by id
//! (so a view can render and dismiss them) and fans every new toast out to
//! live subscriptions. A subscription unsubscribes itself when dropped.
//!
//! Visible toasts expire the same way validation messages do: each one
//! carries a deadline, the event loop calls `tick(now)` and can sleep until
//! `next_deadline()`. At most `MAX_ACTIVE` stay visible; the oldest goes
//! first when a new one would exceed that.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

/// How long a toast stays visible unless dismissed earlier.
pub const DEFAULT_TOAST_LIFETIME: Duration = Duration::from_millis(5000);

pub const MAX_ACTIVE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Identifier of a toast, unique per bus and increasing in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
}

struct Visible {
    toast: Toast,
    /// `None` when the lifetime overflows `Instant`; such a toast stays
    /// until dismissed or pushed out.
    expires_at: Option<Instant>,
}

#[derive(Default)]
struct BusState {
    next_toast: u64,
    next_subscriber: u64,
    active: BTreeMap<ToastId, Visible>,
    subscribers: HashMap<u64, mpsc::UnboundedSender<Toast>>,
}

#[derive(Clone)]
pub struct ToastBus {
    state: Arc<Mutex<BusState>>,
    lifetime: Duration,
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::with_lifetime(DEFAULT_TOAST_LIFETIME)
    }
}

impl fmt::Debug for ToastBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ToastBus")
            .field("active", &state.active.len())
            .field("subscribers", &state.subscribers.len())
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl ToastBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            state: Arc::default(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) {
        self.notify_at(message, kind, Instant::now());
    }

    /// Emits a toast shown from `now` until `now + lifetime`.
    pub fn notify_at(&self, message: impl Into<String>, kind: ToastKind, now: Instant) -> ToastId {
        let mut state = self.lock();
        state.next_toast += 1;
        let toast = Toast {
            id: ToastId(state.next_toast),
            message: message.into(),
            kind,
        };
        tracing::debug!(id = toast.id.0, kind = ?toast.kind, message = %toast.message, "toast");
        state.active.insert(
            toast.id,
            Visible {
                toast: toast.clone(),
                expires_at: now.checked_add(self.lifetime),
            },
        );
        while state.active.len() > MAX_ACTIVE {
            if let Some((evicted, _)) = state.active.pop_first() {
                tracing::debug!(id = evicted.0, "toast pushed out");
            }
        }
        state
            .subscribers
            .retain(|_, sender| sender.send(toast.clone()).is_ok());
        toast.id
    }

    /// Removes every toast whose lifetime has ended and returns their ids.
    pub fn tick(&self, now: Instant) -> Vec<ToastId> {
        let mut state = self.lock();
        let expired: Vec<ToastId> = state
            .active
            .iter()
            .filter(|(_, v)| v.expires_at.is_some_and(|at| at <= now))
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            state.active.remove(id);
        }
        expired
    }

    /// Earliest expiry among visible toasts.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock().active.values().filter_map(|v| v.expires_at).min()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, ToastKind::Error);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(message, ToastKind::Info);
    }

    /// Removes a visible toast. Returns false if it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.lock().active.remove(&id).is_some()
    }

    /// Visible toasts in emission order.
    pub fn active(&self) -> Vec<Toast> {
        self.lock()
            .active
            .values()
            .map(|v| v.toast.clone())
            .collect()
    }

    /// Receives every toast emitted from now on.
    pub fn subscribe(&self) -> ToastSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.next_subscriber += 1;
        let id = state.next_subscriber;
        state.subscribers.insert(id, sender);
        ToastSubscription {
            id,
            bus: self.clone(),
            receiver,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Live feed of toasts from one `ToastBus`.
pub struct ToastSubscription {
    id: u64,
    bus: ToastBus,
    receiver: mpsc::UnboundedReceiver<Toast>,
}

impl ToastSubscription {
    pub async fn recv(&mut self) -> Option<Toast> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Toast> {
        self.receiver.try_recv().ok()
    }

    /// Everything received so far, without waiting.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Drop for ToastSubscription {
    fn drop(&mut self) {
        self.bus.lock().subscribers.remove(&self.id);
    }
}
