#![forbid(unsafe_code)]

//! WASM frontend for pagekit.
//!
//! Binds the controllers from `pagekit-core` to the live browser document:
//! - a [`Dom`](pagekit_core::Dom) implementation over `web-sys`,
//! - listener registration from `Site::bindings` with passive flags honored,
//! - a `setTimeout` driver for the menu's opening hint deadline,
//! - a small `wasm-bindgen` API (`PageKit`, `start`).

pub mod error;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PageKit, WebDom, start};

pub use error::{WebError, parse_options};

/// Whether a `document.readyState` value allows mounting right away.
/// Anything past `"loading"` has a parsed body.
#[must_use]
pub fn document_ready(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets. Options are still parsed and validated.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct PageKit {
    config: pagekit_core::SiteConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl PageKit {
    pub fn new(options: Option<String>) -> Result<Self, WebError> {
        Ok(Self {
            config: parse_options(options.as_deref())?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &pagekit_core::SiteConfig {
        &self.config
    }

    /// Always fails: there is no browser document to bind to.
    pub fn mount(&mut self) -> Result<(), WebError> {
        Err(WebError::Unsupported("mount requires a wasm32 browser host"))
    }

    pub fn unmount(&mut self) {}

    #[must_use]
    pub fn menu_open(&self) -> bool {
        false
    }

    #[must_use]
    pub fn lightbox_index(&self) -> Option<u32> {
        None
    }
}
