#![forbid(unsafe_code)]

//! Tap-to-reveal cards for touch devices.
//!
//! The first touch on a card adds `open` and swallows the touch so an
//! enclosed link is not followed. Once revealed, touches pass through.

use crate::config::{CardConfig, ConfigError, compile};
use crate::dom::{Dom, class};
use crate::input::Disposition;

#[derive(Debug)]
pub struct CardReveal<N> {
    cards: Vec<N>,
}

impl<N: Clone + PartialEq + core::fmt::Debug> CardReveal<N> {
    pub fn mount<D: Dom<Node = N>>(dom: &D, cfg: &CardConfig) -> Result<Self, ConfigError> {
        let cards = dom.query_all(None, &compile("cards.cards", &cfg.cards)?);
        crate::debug!(cards = cards.len(), "card reveal initialized");
        Ok(Self { cards })
    }

    #[must_use]
    pub fn cards(&self) -> &[N] {
        &self.cards
    }

    pub fn on_touch_start<D: Dom<Node = N>>(&self, dom: &D, index: usize) -> Disposition {
        let Some(card) = self.cards.get(index) else {
            return Disposition::empty();
        };
        if dom.has_class(card, class::OPEN) {
            return Disposition::empty();
        }
        dom.add_class(card, class::OPEN);
        crate::trace!(index, "card revealed");
        Disposition::PREVENT_DEFAULT
    }
}
