use std::any::TypeId;
use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Click on a bar of the grouped outcome chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarClickEvent {
    /// Index of the clicked series (0 = Successful, 1 = Failed)
    pub curve_number: i64,
    /// Category (region) under the click
    pub x_value: String,
}

/// Change of a single filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterChangeEvent {
    Region(String),
    Species(String),
    RestStopRange { low: i64, high: i64 },
}

type SharedHandler = Arc<Mutex<Box<dyn EventHandler>>>;

/// Dashboard-wide notification bus.
///
/// Handlers run after the registry lock is released, so a handler may
/// subscribe or publish other notifications. A handler that publishes the
/// type it is handling would wait on itself.
pub struct EventBus {
    handlers: Mutex<AHashMap<TypeId, Vec<SharedHandler>>>,
}

/// Event trait that all notifications must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Notifications published by the dashboard
pub mod events {
    use super::Event;
    use crate::selection::{DrillSelection, SelectionState};

    /// Dataset loaded at startup
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub row_count: usize,
        pub skipped_rows: usize,
    }

    /// Filter controls produced a new selection
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub selection: SelectionState,
        pub segment_count: usize,
    }

    /// A bar click drilled into a region and outcome
    #[derive(Debug, Clone)]
    pub struct DrillChanged {
        pub drill: DrillSelection,
        pub row_count: usize,
    }

    /// A selection outside the observed domain was refused
    #[derive(Debug, Clone)]
    pub struct SelectionRejected {
        pub reason: String,
    }

    /// An interaction event was not recognized and dropped
    #[derive(Debug, Clone)]
    pub struct EventIgnored {
        pub reason: String,
    }

    /// Selection and drill state returned to their startup values
    #[derive(Debug, Clone)]
    pub struct DashboardReset;

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        SelectionChanged,
        DrillChanged,
        SelectionRejected,
        EventIgnored,
        DashboardReset
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(AHashMap::new()),
        }
    }

    /// Register a handler for notifications of type `E`
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Arc::new(Mutex::new(handler)));
    }

    /// Number of handlers registered for `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers.lock().get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler registered for its type, in
    /// subscription order
    pub fn publish<E: Event>(&self, event: E) {
        let targets: Vec<SharedHandler> = match self.handlers.lock().get(&TypeId::of::<E>()) {
            Some(registered) => registered.clone(),
            None => return,
        };

        for handler in targets {
            handler.lock().handle(&event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_reaches_typed_subscribers_only() {
        let bus = EventBus::new();
        let rejected = Arc::new(AtomicUsize::new(0));

        let counter = rejected.clone();
        bus.subscribe::<events::SelectionRejected>(handler_from_fn(move |event| {
            if event.as_any().downcast_ref::<events::SelectionRejected>().is_some() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        bus.publish(events::SelectionRejected { reason: "bad region".to_string() });
        bus.publish(events::EventIgnored { reason: "curve 2".to_string() });
        bus.publish(events::SelectionRejected { reason: "bad species".to_string() });

        assert_eq!(rejected.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_may_publish_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let ignored = Arc::new(AtomicUsize::new(0));

        let inner_bus = bus.clone();
        let counter = ignored.clone();
        bus.subscribe::<events::DashboardReset>(handler_from_fn(move |_| {
            let counter = counter.clone();
            inner_bus.subscribe::<events::EventIgnored>(handler_from_fn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
            inner_bus.publish(events::EventIgnored { reason: "after reset".to_string() });
        }));

        bus.publish(events::DashboardReset);
        assert_eq!(bus.subscriber_count::<events::EventIgnored>(), 1);
        assert_eq!(ignored.load(Ordering::SeqCst), 1);

        bus.publish(events::DashboardReset);
        assert_eq!(bus.subscriber_count::<events::EventIgnored>(), 2);
        assert_eq!(ignored.load(Ordering::SeqCst), 3);
    }
}
