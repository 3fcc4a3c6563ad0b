//! Lifecycle events: types and delivery queue.
//!
//! This module groups the event **data model** and the **queue** that carries
//! events from orchestrator callback threads to the application's drain tick.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`DeliveryQueue`] bounded single-consumer FIFO over `tokio::sync::mpsc`
//!
//! ## Quick reference
//! - **Publisher**: [`LifecycleBridge`](crate::LifecycleBridge), from whichever
//!   thread the orchestrator client delivers a callback on.
//! - **Consumer**: [`EventSink::drain`](crate::EventSink::drain), called from
//!   the application's main-loop tick.

mod event;
mod queue;

pub use event::{Event, EventKind};
pub use queue::DeliveryQueue;
