//! # Cart Events
//!
//! Lifecycle events published after the cart has been persisted.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle Events                                │
//! │                                                                         │
//! │  Operation        Event name          Payload                          │
//! │  ─────────        ──────────          ───────                          │
//! │  add(item)    ──► shopcart.add    ──► processed item                   │
//! │  update(item) ──► shopcart.update ──► processed item                   │
//! │  remove(item) ──► shopcart.remove ──► removed item                     │
//! │  forget()     ──► shopcart.forget ──► no item                          │
//! │                                                                         │
//! │  Dispatch is fire-and-forget: the manager never looks at a result,     │
//! │  and a failed call never dispatches.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopcart_core::CartItem;
use tracing::info;

// =============================================================================
// Event Types
// =============================================================================

/// Which cart operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    Add,
    Update,
    Remove,
    /// The whole cart was discarded.
    Forget,
}

impl CartAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartAction::Add => "add",
            CartAction::Update => "update",
            CartAction::Remove => "remove",
            CartAction::Forget => "forget",
        }
    }

    /// Fully qualified event name, e.g. `shopcart.add`.
    pub fn event_name(&self) -> &'static str {
        match self {
            CartAction::Add => "shopcart.add",
            CartAction::Update => "shopcart.update",
            CartAction::Remove => "shopcart.remove",
            CartAction::Forget => "shopcart.forget",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub action: CartAction,

    /// Session key of the cart that changed.
    pub session_key: String,

    /// The affected item. `None` for [`CartAction::Forget`].
    pub item: Option<CartItem>,

    pub occurred_at: DateTime<Utc>,
}

impl CartEvent {
    pub(crate) fn new(action: CartAction, session_key: &str, item: Option<CartItem>) -> Self {
        CartEvent {
            action,
            session_key: session_key.to_string(),
            item,
            occurred_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.action.event_name()
    }
}

// =============================================================================
// Dispatchers
// =============================================================================

/// Event publishing facility supplied by the host.
pub trait EventDispatcher {
    fn dispatch(&self, event: &CartEvent);
}

impl<F> EventDispatcher for F
where
    F: Fn(&CartEvent),
{
    fn dispatch(&self, event: &CartEvent) {
        self(event)
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDispatcher;

impl EventDispatcher for NullDispatcher {
    fn dispatch(&self, _event: &CartEvent) {}
}

/// Writes every event to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatcher;

impl EventDispatcher for TracingDispatcher {
    fn dispatch(&self, event: &CartEvent) {
        match &event.item {
            Some(item) => info!(
                event = event.name(),
                session_key = %event.session_key,
                row_id = %item.row_id(),
                product_id = item.id,
                quantity = item.quantity,
                "Cart event"
            ),
            None => info!(
                event = event.name(),
                session_key = %event.session_key,
                "Cart event"
            ),
        }
    }
}

/// Keeps every dispatched event in a shared buffer.
///
/// Clones share the buffer, so a test can hand one clone to the manager and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    events: Arc<Mutex<Vec<CartEvent>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far, oldest first.
    pub fn events(&self) -> Vec<CartEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn actions(&self) -> Vec<CartAction> {
        self.events().iter().map(|e| e.action).collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: &CartEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
