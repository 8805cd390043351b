#![forbid(unsafe_code)]

//! Core: host-agnostic controllers for pagekit.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment registers the listeners
//!   returned by [`site::Site::bindings`] and forwards normalized events.
//! - **Deterministic time**: the host passes a monotonic `Duration` with each
//!   dispatch and calls [`site::Site::tick`] at reported deadlines.
//! - **No browser dependency**: all document access goes through
//!   [`dom::Dom`], with [`memory_dom::MemoryDom`] as a native stand-in.

pub mod card_tap;
pub mod config;
pub mod dom;
pub mod filter;
pub mod focus_trap;
pub mod input;
pub mod lightbox;
pub mod logging;
pub mod memory_dom;
pub mod menu;
pub mod selector;
pub mod site;
pub mod swipe;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use config::{ConfigError, SiteConfig};
pub use dom::Dom;
pub use input::{Disposition, EventId, KeyCode, KeyInput, Modifiers, TouchInput, TouchPhase};
pub use site::{Binding, DomEvent, EventKind, Listener, Site, Target};
