//! ensemble-hub - External interfaces for the routing engine
//!
//! This crate provides:
//! - HTTP client for the room/task hub (join/leave, messages, tasks)
//! - Wire types for live-transport events and their conversion into
//!   core room events
//! - The `EventSource` trait that transports implement to feed a
//!   room session's channel

pub mod client;
pub mod events;
pub mod polling;
pub mod source;

pub use client::{Capabilities, HubClient, HubTask, JoinedRoom, NewTask, TaskQuery};
pub use events::{TransportEvent, WireMessage, WireNotification, WireTask};
pub use polling::PollingSource;
pub use source::EventSource;
