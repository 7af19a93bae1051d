use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Dashboard-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dashboard events
pub mod events {
    use super::Event;
    use crate::state::ViewMode;

    /// Why a re-render was requested
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RenderReason {
        FilterChanged,
        ViewModeChanged,
        DrilldownChanged,
        DatasetReplaced,
    }

    /// Derived data is stale; views must re-aggregate before drawing
    #[derive(Debug, Clone)]
    pub struct RenderNeeded {
        pub reason: RenderReason,
    }

    /// A new record set was installed
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub row_count: usize,
        pub years: Vec<i32>,
    }

    /// The active view controller changed
    #[derive(Debug, Clone)]
    pub struct ViewModeChanged {
        pub mode: ViewMode,
    }

    /// A drill-down modal was opened
    #[derive(Debug, Clone)]
    pub struct DrilldownOpened {
        pub title: String,
        pub record_count: usize,
    }

    /// The drill-down modal was closed
    #[derive(Debug, Clone)]
    pub struct DrilldownClosed;

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
        RenderNeeded,
        DatasetLoaded,
        ViewModeChanged,
        DrilldownOpened,
        DrilldownClosed
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
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
