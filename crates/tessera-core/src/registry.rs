//! Cross-screen activation registry.
//!
//! At most one screen's output is the visible one at any time. Instead of a
//! process-global event bus, activation goes through an explicit
//! [`ScreenRegistry`] owned by the application: screens register on creation,
//! deregister on drop, and an activation broadcast flips every live
//! activation flag under a single lock so no interleaving can leave two
//! screens active.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

static NEXT_SCREEN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(u64);

impl ScreenId {
    fn next() -> Self {
        Self(NEXT_SCREEN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen-{}", self.0)
    }
}

/// A typed activation event consumed by live registrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    /// The named screen became the active one; all others deactivate.
    Activated(ScreenId),
}

#[derive(Debug)]
struct Registrant {
    id: ScreenId,
    active: Weak<AtomicBool>,
}

/// Registry of live screens sharing one physical output.
///
/// Owned by the application; create one at startup, hand an `Arc` of it to
/// each screen, and drop it at shutdown. Nothing here is global state, so
/// test setups get isolated registries for free.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    registrants: Mutex<Vec<Registrant>>,
}

impl ScreenRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new screen, allocating its identity and activation flag.
    ///
    /// The returned [`Registration`] deregisters itself when dropped.
    #[must_use]
    pub fn register(self: &Arc<Self>) -> Registration {
        let id = ScreenId::next();
        let active = Arc::new(AtomicBool::new(false));
        self.registrants.lock().push(Registrant {
            id,
            active: Arc::downgrade(&active),
        });
        debug!(screen = %id, "screen registered");
        Registration {
            id,
            active,
            registry: Arc::clone(self),
        }
    }

    /// Deliver an event to all live registrants.
    ///
    /// Activation flips every flag under the registry lock, so "exactly one
    /// active screen" holds at every point another thread can observe.
    fn broadcast(&self, event: ScreenEvent) {
        let ScreenEvent::Activated(activated) = event;
        let mut registrants = self.registrants.lock();
        registrants.retain(|registrant| registrant.active.strong_count() > 0);
        for registrant in &*registrants {
            if let Some(flag) = registrant.active.upgrade() {
                let becomes_active = registrant.id == activated;
                if !becomes_active && flag.swap(false, Ordering::SeqCst) {
                    debug!(screen = %registrant.id, "screen deactivated by switch");
                }
                if becomes_active {
                    flag.store(true, Ordering::SeqCst);
                }
            }
        }
        debug!(screen = %activated, "screen activated");
    }

    /// The currently active screen, if any.
    #[must_use]
    pub fn active_screen(&self) -> Option<ScreenId> {
        self.registrants
            .lock()
            .iter()
            .find(|registrant| {
                registrant
                    .active
                    .upgrade()
                    .is_some_and(|flag| flag.load(Ordering::SeqCst))
            })
            .map(|registrant| registrant.id)
    }

    /// Number of live registered screens.
    #[must_use]
    pub fn live_screens(&self) -> usize {
        let mut registrants = self.registrants.lock();
        registrants.retain(|registrant| registrant.active.strong_count() > 0);
        registrants.len()
    }

    fn deregister(&self, id: ScreenId) {
        self.registrants
            .lock()
            .retain(|registrant| registrant.id != id);
        debug!(screen = %id, "screen deregistered");
    }
}

/// A screen's handle on the registry: identity plus activation flag.
///
/// Dropping the handle deregisters the screen.
#[derive(Debug)]
pub struct Registration {
    id: ScreenId,
    active: Arc<AtomicBool>,
    registry: Arc<ScreenRegistry>,
}

impl Registration {
    /// This screen's identity.
    #[must_use]
    pub const fn id(&self) -> ScreenId {
        self.id
    }

    /// Whether this screen is the active one.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Make this screen the active one, deactivating all others.
    pub fn activate(&self) {
        self.registry.broadcast(ScreenEvent::Activated(self.id));
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_ids_are_unique() {
        let registry = Arc::new(ScreenRegistry::new());
        let a = registry.register();
        let b = registry.register();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_activation_deactivates_others() {
        let registry = Arc::new(ScreenRegistry::new());
        let a = registry.register();
        let b = registry.register();

        a.activate();
        assert!(a.is_active());
        assert!(!b.is_active());
        assert_eq!(registry.active_screen(), Some(a.id()));

        b.activate();
        assert!(!a.is_active());
        assert!(b.is_active());
        assert_eq!(registry.active_screen(), Some(b.id()));
    }

    #[test]
    fn test_reactivation_is_idempotent() {
        let registry = Arc::new(ScreenRegistry::new());
        let a = registry.register();
        a.activate();
        a.activate();
        assert!(a.is_active());
        assert_eq!(registry.active_screen(), Some(a.id()));
    }

    #[test]
    fn test_drop_deregisters() {
        let registry = Arc::new(ScreenRegistry::new());
        let a = registry.register();
        let b = registry.register();
        assert_eq!(registry.live_screens(), 2);

        drop(a);
        assert_eq!(registry.live_screens(), 1);
        b.activate();
        assert_eq!(registry.active_screen(), Some(b.id()));
    }

    #[test]
    fn test_no_active_screen_initially() {
        let registry = Arc::new(ScreenRegistry::new());
        let _a = registry.register();
        assert_eq!(registry.active_screen(), None);
    }

    #[test]
    fn test_concurrent_activations_leave_exactly_one_active() {
        let registry = Arc::new(ScreenRegistry::new());
        let screens: Vec<Arc<Registration>> =
            (0..8).map(|_| Arc::new(registry.register())).collect();

        let handles: Vec<_> = screens
            .iter()
            .map(|screen| {
                let screen = Arc::clone(screen);
                thread::spawn(move || {
                    for _ in 0..50 {
                        screen.activate();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let active = screens.iter().filter(|s| s.is_active()).count();
        assert_eq!(active, 1);
    }
}
