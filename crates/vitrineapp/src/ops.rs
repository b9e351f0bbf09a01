//! Per-operation in-flight tracking.
//!
//! Every taxonomy mutation runs under an [`OpGuard`] obtained from
//! [`OperationTracker::begin`]. The tracker keeps one small state machine per
//! [`Operation`]:
//!
//! ```text
//! Idle ──begin──> InFlight ──guard dropped──> Done ──begin──> InFlight ...
//! ```
//!
//! Single-flight operations refuse a second `begin` while one is in flight;
//! the refused call is dropped, not queued. Other operations may overlap
//! freely and are only tracked.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddCategory,
    RemoveCategory,
    AddSubcategory,
    RemoveSubcategory,
    AddAttribute,
    RemoveAttribute,
    UpdateAttribute,
}

impl Operation {
    /// Whether a concurrent second call is rejected.
    pub fn is_single_flight(self) -> bool {
        matches!(self, Operation::RemoveCategory)
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::AddCategory => "Category creation",
            Operation::RemoveCategory => "Category deletion",
            Operation::AddSubcategory => "Subcategory creation",
            Operation::RemoveSubcategory => "Subcategory deletion",
            Operation::AddAttribute => "Attribute creation",
            Operation::RemoveAttribute => "Attribute deletion",
            Operation::UpdateAttribute => "Attribute update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    Idle,
    InFlight,
    Done,
}

#[derive(Debug, Default)]
struct Slot {
    in_flight: usize,
    completed: bool,
}

#[derive(Debug, Default)]
pub struct OperationTracker {
    slots: Mutex<HashMap<Operation, Slot>>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, op: Operation) -> Result<OpGuard<'_>> {
        let mut slots = self.slots.lock();
        let slot = slots.entry(op).or_default();
        if op.is_single_flight() && slot.in_flight > 0 {
            return Err(CatalogError::InProgress(op));
        }
        slot.in_flight += 1;
        Ok(OpGuard { tracker: self, op })
    }

    pub fn state(&self, op: Operation) -> OpState {
        match self.slots.lock().get(&op) {
            Some(slot) if slot.in_flight > 0 => OpState::InFlight,
            Some(slot) if slot.completed => OpState::Done,
            _ => OpState::Idle,
        }
    }
}

/// Marks its operation in flight until dropped, including when the owning
/// future is cancelled.
pub struct OpGuard<'a> {
    tracker: &'a OperationTracker,
    op: Operation,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.tracker.slots.lock();
        if let Some(slot) = slots.get_mut(&self.op) {
            slot.in_flight = slot.in_flight.saturating_sub(1);
            slot.completed = true;
        }
    }
}
