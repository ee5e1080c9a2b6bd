//! Domain events and their in-process distribution.
//!
//! Stores emit events as facts about what changed; the board wraps them in
//! envelopes and fans them out so a presentation layer knows when to re-render.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
