mod events;
mod sink;

pub use events::PublisherEvent;
pub use sink::{EventSink, TracingEventSink, VecEventSink};
