//! Shared test fixtures and utilities for the Quire event store.

mod clock;
mod converter;
mod messages;
mod user_events;

pub use clock::{FixedClock, fixed_time};
pub use converter::DroppingMessageConverter;
pub use messages::{domain_message, init_tracing, object, scratch_dir, stream_name};
pub use user_events::{
    UserEvent, UserEventConverter, UserEventFactory, UserEventKind, UserRegistered, UserRenamed,
};
