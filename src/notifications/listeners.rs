//! Listener bridge between the notification service and application state.
//!
//! [`NotificationCenter`] is the event source: the service emits "received"
//! events (delivered while foregrounded) and "response" events (the user
//! interacted with a notification). [`subscribe`] registers the two
//! application listeners and returns a [`ListenerSet`] that releases both when
//! unsubscribed or dropped.
//!
//! Releasing is idempotent: a handle that was already released, or never
//! acquired ([`ListenerHandle::detached`]), is a no-op.

// Rust guideline compliant 2026-02

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use super::payload::{NotificationEvent, NotificationResponse};
use super::slot::StateSlot;

type ReceivedCallback = Arc<dyn Fn(&NotificationEvent) + Send + Sync>;
type ResponseCallback = Arc<dyn Fn(&NotificationResponse) + Send + Sync>;

/// Which event stream a listener is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerKind {
    /// Notification delivered while the app is foregrounded.
    Received,
    /// User interacted with a delivered notification.
    Responded,
}

/// A registered callback. `alive` is cleared on removal so a snapshot taken
/// before the removal skips it.
struct Entry<C> {
    id: u64,
    alive: Arc<AtomicBool>,
    callback: C,
}

impl<C: Clone> Entry<C> {
    fn snapshot(&self) -> (Arc<AtomicBool>, C) {
        (Arc::clone(&self.alive), self.callback.clone())
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    received: Vec<Entry<ReceivedCallback>>,
    responded: Vec<Entry<ResponseCallback>>,
}

/// Source of notification events; fans each event out to its listeners.
#[derive(Default)]
pub struct NotificationCenter {
    registry: Mutex<Registry>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl NotificationCenter {
    /// Creates a center with no listeners.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a listener for foreground deliveries.
    pub fn add_received_listener<F>(self: &Arc<Self>, callback: F) -> ListenerHandle
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
    {
        let id = self.with_registry(|registry| {
            let id = registry.allocate_id();
            registry.received.push(Entry {
                id,
                alive: Arc::new(AtomicBool::new(true)),
                callback: Arc::new(callback),
            });
            id
        });
        ListenerHandle::attached(id, ListenerKind::Received, self)
    }

    /// Registers a listener for user responses.
    pub fn add_response_listener<F>(self: &Arc<Self>, callback: F) -> ListenerHandle
    where
        F: Fn(&NotificationResponse) + Send + Sync + 'static,
    {
        let id = self.with_registry(|registry| {
            let id = registry.allocate_id();
            registry.responded.push(Entry {
                id,
                alive: Arc::new(AtomicBool::new(true)),
                callback: Arc::new(callback),
            });
            id
        });
        ListenerHandle::attached(id, ListenerKind::Responded, self)
    }

    /// Delivers `event` to every received listener. Returns how many ran.
    ///
    /// A listener removed while the event is being delivered is skipped,
    /// even if it was registered when delivery started.
    pub fn emit_received(&self, event: &NotificationEvent) -> usize {
        // Callbacks run outside the lock so they may (un)subscribe.
        let callbacks = self.with_registry(|registry| {
            registry.received.iter().map(Entry::snapshot).collect::<Vec<_>>()
        });
        let mut ran = 0;
        for (alive, callback) in &callbacks {
            if alive.load(Ordering::SeqCst) {
                callback(event);
                ran += 1;
            }
        }
        ran
    }

    /// Delivers `response` to every response listener. Returns how many ran.
    pub fn emit_response(&self, response: &NotificationResponse) -> usize {
        let callbacks = self.with_registry(|registry| {
            registry.responded.iter().map(Entry::snapshot).collect::<Vec<_>>()
        });
        let mut ran = 0;
        for (alive, callback) in &callbacks {
            if alive.load(Ordering::SeqCst) {
                callback(response);
                ran += 1;
            }
        }
        ran
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.with_registry(|registry| registry.received.len() + registry.responded.len())
    }

    fn remove(&self, kind: ListenerKind, id: u64) -> bool {
        self.with_registry(|registry| match kind {
            ListenerKind::Received => take_entry(&mut registry.received, id),
            ListenerKind::Responded => take_entry(&mut registry.responded, id),
        })
    }

    fn with_registry<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        // A panicking listener must not disable the whole center.
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut registry)
    }
}

/// Removes the entry with `id` and marks it dead. Returns whether it existed.
fn take_entry<C>(entries: &mut Vec<Entry<C>>, id: u64) -> bool {
    let Some(index) = entries.iter().position(|entry| entry.id == id) else {
        return false;
    };
    entries.remove(index).alive.store(false, Ordering::SeqCst);
    true
}

impl Registry {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Subscription to one event stream.
///
/// Released on [`ListenerHandle::remove`] or on drop, whichever comes first.
#[derive(Debug)]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
    center: Weak<NotificationCenter>,
    active: bool,
}

impl ListenerHandle {
    fn attached(id: u64, kind: ListenerKind, center: &Arc<NotificationCenter>) -> Self {
        Self {
            id,
            kind,
            center: Arc::downgrade(center),
            active: true,
        }
    }

    /// A handle that was never acquired. Removing it does nothing.
    pub fn detached(kind: ListenerKind) -> Self {
        Self {
            id: 0,
            kind,
            center: Weak::new(),
            active: false,
        }
    }

    /// Whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Releases the subscription. Returns `true` only on the first call
    /// that actually removed a listener.
    pub fn remove(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }
        self.center
            .upgrade()
            .is_some_and(|center| center.remove(self.kind, self.id))
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

/// The two subscriptions owned by a mounted controller.
#[derive(Debug)]
pub struct ListenerSet {
    /// Foreground delivery listener.
    pub on_received: ListenerHandle,
    /// User response listener.
    pub on_responded: ListenerHandle,
}

impl ListenerSet {
    /// Releases both subscriptions. Safe to call any number of times.
    pub fn unsubscribe(&mut self) {
        let received = self.on_received.remove();
        let responded = self.on_responded.remove();
        if received || responded {
            log::debug!("[Listeners] Unsubscribed from notification events");
        }
    }

    /// Whether either subscription is still live.
    pub fn is_active(&self) -> bool {
        self.on_received.is_active() || self.on_responded.is_active()
    }
}

/// Subscribes both application listeners.
///
/// Received events overwrite `current`; responses are only logged.
pub fn subscribe(
    center: &Arc<NotificationCenter>,
    current: Arc<StateSlot<NotificationEvent>>,
) -> ListenerSet {
    let on_received = center.add_received_listener(move |event| {
        log::info!(
            "[Listeners] Notification received: id={} title={:?}",
            event.identifier,
            event.payload.title
        );
        current.set(event.clone());
    });

    let on_responded = center.add_response_listener(|response| {
        log::info!("[Listeners] Notification response: {response:?}");
    });

    ListenerSet {
        on_received,
        on_responded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::payload::NotificationPayload;

    fn event(n: usize) -> NotificationEvent {
        NotificationEvent::delivered_now(
            format!("n-{n}"),
            NotificationPayload::new(format!("title {n}"), format!("body {n}")),
        )
    }

    #[test]
    fn test_last_received_event_wins() {
        let center = NotificationCenter::new();
        let slot = Arc::new(StateSlot::new());
        let _set = subscribe(&center, Arc::clone(&slot));

        for n in 1..=7 {
            center.emit_received(&event(n));
        }
        let current = slot.get().expect("current notification");
        assert_eq!(current.identifier, "n-7");
        assert_eq!(current.payload.title, "title 7");
    }

    #[test]
    fn test_no_updates_after_unsubscribe() {
        let center = NotificationCenter::new();
        let slot = Arc::new(StateSlot::new());
        let mut set = subscribe(&center, Arc::clone(&slot));

        center.emit_received(&event(1));
        set.unsubscribe();
        assert_eq!(center.listener_count(), 0);
        assert_eq!(center.emit_received(&event(2)), 0);
        assert_eq!(slot.get().map(|e| e.identifier), Some("n-1".to_string()));
    }

    #[test]
    fn test_double_unsubscribe_is_noop() {
        let center = NotificationCenter::new();
        let mut set = subscribe(&center, Arc::new(StateSlot::new()));
        set.unsubscribe();
        set.unsubscribe();
        assert!(!set.is_active());
    }

    #[test]
    fn test_detached_handle_remove_is_noop() {
        let mut handle = ListenerHandle::detached(ListenerKind::Received);
        assert!(!handle.remove());
        assert!(!handle.remove());
    }

    #[test]
    fn test_drop_releases_listeners() {
        let center = NotificationCenter::new();
        {
            let _set = subscribe(&center, Arc::new(StateSlot::new()));
            assert_eq!(center.listener_count(), 2);
        }
        assert_eq!(center.listener_count(), 0);
    }

    #[test]
    fn test_handle_outlives_center() {
        let center = NotificationCenter::new();
        let mut handle = center.add_received_listener(|_| {});
        drop(center);
        assert!(!handle.remove());
    }

    #[test]
    fn test_response_listener_does_not_touch_slot() {
        let center = NotificationCenter::new();
        let slot = Arc::new(StateSlot::new());
        let _set = subscribe(&center, Arc::clone(&slot));

        let delivered = center.emit_response(&NotificationResponse::default_action(event(3)));
        assert_eq!(delivered, 1);
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let center = NotificationCenter::new();
        let handle = Arc::new(Mutex::new(None::<ListenerHandle>));
        let inner = Arc::clone(&handle);
        let registered = center.add_received_listener(move |_| {
            if let Some(mut h) = inner.lock().unwrap().take() {
                h.remove();
            }
        });
        *handle.lock().unwrap() = Some(registered);

        assert_eq!(center.emit_received(&event(1)), 1);
        assert_eq!(center.emit_received(&event(2)), 0);
    }

    #[test]
    fn test_unsubscribe_during_delivery_skips_remaining_listener() {
        let center = NotificationCenter::new();
        let slot = Arc::new(StateSlot::new());
        let app_set = Arc::new(Mutex::new(None::<ListenerSet>));

        // Registered first, so it runs before the app listener.
        let teardown = Arc::clone(&app_set);
        let _early = center.add_received_listener(move |_| {
            if let Some(set) = teardown.lock().unwrap().as_mut() {
                set.unsubscribe();
            }
        });
        *app_set.lock().unwrap() = Some(subscribe(&center, Arc::clone(&slot)));

        assert_eq!(center.emit_received(&event(1)), 1);
        assert!(slot.get().is_none());
        assert!(!app_set.lock().unwrap().as_ref().unwrap().is_active());
    }

    #[test]
    fn test_response_listener_removed_during_delivery_is_skipped() {
        let center = NotificationCenter::new();
        let calls = Arc::new(AtomicBool::new(false));
        let later = Arc::new(Mutex::new(None::<ListenerHandle>));

        let remover = Arc::clone(&later);
        let _first = center.add_response_listener(move |_| {
            if let Some(mut handle) = remover.lock().unwrap().take() {
                handle.remove();
            }
        });
        let flag = Arc::clone(&calls);
        *later.lock().unwrap() = Some(center.add_response_listener(move |_| {
            flag.store(true, Ordering::SeqCst);
        }));

        let response = NotificationResponse::default_action(event(1));
        assert_eq!(center.emit_response(&response), 1);
        assert!(!calls.load(Ordering::SeqCst));
    }
}
