//! Synchronous observer list for combat events.
//!
//! Subscribers are called in subscription order, immediately, on the
//! thread that emits. There is no queueing and no scene-graph coupling.

use super::event::{CombatEvent, EventKind};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u32);

type Subscriber = Box<dyn FnMut(&CombatEvent)>;

struct Subscription {
    id: SubscriberId,
    filter: Option<EventKind>,
    callback: Subscriber,
}

/// Event bus delivering combat events to subscribers.
///
/// ## Usage
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use typecharge::events::{CombatEvent, EventBus, EventKind};
///
/// let mut bus = EventBus::new();
/// let combos = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&combos);
/// bus.subscribe_kind(EventKind::ComboChanged, move |event| {
///     if let CombatEvent::ComboChanged { combo } = event {
///         sink.borrow_mut().push(*combo);
///     }
/// });
///
/// bus.emit(CombatEvent::ComboChanged { combo: 2 });
/// assert_eq!(*combos.borrow(), vec![2]);
/// ```
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscription>,
    next_id: u32,
    /// Emitted events, kept only when history is enabled.
    history: Option<Vec<CombatEvent>>,
}

impl EventBus {
    /// Create an empty bus without history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus that also records every emitted event.
    #[must_use]
    pub fn with_history() -> Self {
        Self {
            history: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Subscribe to every event.
    pub fn subscribe(&mut self, callback: impl FnMut(&CombatEvent) + 'static) -> SubscriberId {
        self.add(None, Box::new(callback))
    }

    /// Subscribe to one kind of event.
    pub fn subscribe_kind(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&CombatEvent) + 'static,
    ) -> SubscriberId {
        self.add(Some(kind), Box::new(callback))
    }

    fn add(&mut self, filter: Option<EventKind>, callback: Subscriber) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscription { id, filter, callback });
        id
    }

    /// Remove a subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver an event to all matching subscribers, in subscription order.
    pub fn emit(&mut self, event: CombatEvent) {
        tracing::trace!(?event, "emit");
        let kind = event.kind();
        for sub in &mut self.subscribers {
            if sub.filter.is_none_or(|k| k == kind) {
                (sub.callback)(&event);
            }
        }
        if let Some(history) = self.history.as_mut() {
            history.push(event);
        }
    }

    /// Recorded events (empty when history is disabled).
    #[must_use]
    pub fn history(&self) -> &[CombatEvent] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// Take the recorded events, leaving history enabled but empty.
    pub fn take_history(&mut self) -> Vec<CombatEvent> {
        self.history.as_mut().map(std::mem::take).unwrap_or_default()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("history", &self.history.as_ref().map(Vec::len))
            .finish()
    }
}
