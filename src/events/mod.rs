//! Observable combat events.
//!
//! Combat components report state changes by emitting [`CombatEvent`]s on
//! an [`EventBus`] passed in by the caller. UI, achievement and analytics
//! code subscribe to the bus; they never touch tracks directly.
//!
//! Events are delivered synchronously, in emission order, at most once
//! per state change.

mod bus;
mod event;

pub use bus::{EventBus, SubscriberId};
pub use event::{ChargeSource, CombatEvent, EventKind};
