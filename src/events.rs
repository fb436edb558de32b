/// Store notifications.
///
/// The rendering layer learns about state changes through `StoreEvent`s. Each
/// listener is registered with `EventEmitter::subscribe` and removed with the
/// returned `ListenerId`. Events are delivered synchronously, in subscription
/// order, when the operation that caused them completes. A deferred reset
/// emits `BeforeReset` on request and `Reset` when it actually runs.

use crate::paste::GridPosition;
use crate::row::RowState;
use crate::value::RowKey;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Rows were inserted at `at`
    Add {
        row_keys: Vec<RowKey>,
        at: usize,
        extend_prev_row_span: bool,
    },

    /// A row was removed
    Remove { row_key: RowKey },

    /// A cell (or the `_button` checkbox field) was written
    Change { row_key: RowKey, column_name: String },

    /// A row's enable/checkbox state changed
    RowStateChanged { row_key: RowKey, row_state: RowState },

    /// A rectangular paste finished
    Paste { start: GridPosition, end: GridPosition },

    /// Sort options changed; `is_require_fetch` means the caller must reload
    SortChanged {
        column_name: String,
        is_ascending: bool,
        is_require_fetch: bool,
    },

    /// Rows were reordered in memory
    Sort,

    DisabledChanged { is_disabled: bool },

    /// A reset was requested; it may complete later
    BeforeReset,

    /// A reset completed
    Reset { row_count: usize },
}

impl StoreEvent {
    /// Short name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::Add { .. } => "add",
            StoreEvent::Remove { .. } => "remove",
            StoreEvent::Change { .. } => "change",
            StoreEvent::RowStateChanged { .. } => "rowStateChanged",
            StoreEvent::Paste { .. } => "paste",
            StoreEvent::SortChanged { .. } => "sortChanged",
            StoreEvent::Sort => "sort",
            StoreEvent::DisabledChanged { .. } => "disabledChanged",
            StoreEvent::BeforeReset => "beforeReset",
            StoreEvent::Reset { .. } => "reset",
        }
    }
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
    /// Number of events emitted so far
    emitted: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn emit(&mut self, event: StoreEvent) {
        self.emitted += 1;
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let mut emitter = EventEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        emitter.subscribe(move |e| sink.borrow_mut().push(e.kind()));

        emitter.emit(StoreEvent::BeforeReset);
        emitter.emit(StoreEvent::Reset { row_count: 3 });

        assert_eq!(*seen.borrow(), vec!["beforeReset", "reset"]);
        assert_eq!(emitter.emitted(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut emitter = EventEmitter::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = emitter.subscribe(move |_| *sink.borrow_mut() += 1);

        emitter.emit(StoreEvent::Sort);
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit(StoreEvent::Sort);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }
}
