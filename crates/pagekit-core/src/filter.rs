#![forbid(unsafe_code)]

//! Category filter for content cards.
//!
//! Cards are hidden with the `hide` class, never removed from the document.

use crate::config::{ConfigError, FilterConfig, compile};
use crate::dom::{Dom, class};

/// Category identifier carried by filter buttons and cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What a button selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice {
    /// Show every card.
    All,
    Only(Category),
    /// Button without a category: shows the cards that have none either.
    Uncategorized,
}

impl FilterChoice {
    #[must_use]
    pub fn admits(&self, card: Option<&Category>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => card == Some(wanted),
            Self::Uncategorized => card.is_none(),
        }
    }
}

#[derive(Debug)]
struct Tagged<N, T> {
    node: N,
    tag: T,
}

/// Filter controller.
#[derive(Debug)]
pub struct CategoryFilter<N> {
    buttons: Vec<Tagged<N, FilterChoice>>,
    cards: Vec<Tagged<N, Option<Category>>>,
}

impl<N: Clone + PartialEq + core::fmt::Debug> CategoryFilter<N> {
    /// Read buttons and cards. `Ok(None)` when the page has no filter buttons.
    pub fn mount<D: Dom<Node = N>>(
        dom: &D,
        cfg: &FilterConfig,
    ) -> Result<Option<Self>, ConfigError> {
        let buttons = dom.query_all(None, &compile("filter.buttons", &cfg.buttons)?);
        if buttons.is_empty() {
            crate::debug!("category filter not initialized: no filter buttons");
            return Ok(None);
        }
        let cards = dom.query_all(None, &compile("filter.cards", &cfg.cards)?);

        let attr = cfg.category_attribute.as_str();
        let buttons = buttons
            .into_iter()
            .map(|node| {
                let tag = match dom.attribute(&node, attr) {
                    Some(value) if value == cfg.all_category => FilterChoice::All,
                    Some(value) => FilterChoice::Only(Category(value)),
                    None => FilterChoice::Uncategorized,
                };
                Tagged { node, tag }
            })
            .collect::<Vec<_>>();
        let cards = cards
            .into_iter()
            .map(|node| {
                let tag = dom.attribute(&node, attr).map(Category);
                Tagged { node, tag }
            })
            .collect::<Vec<_>>();

        crate::debug!(
            buttons = buttons.len(),
            cards = cards.len(),
            "category filter initialized"
        );
        Ok(Some(Self { buttons, cards }))
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &N> {
        self.buttons.iter().map(|b| &b.node)
    }

    /// Activate button `index` and apply its category. Out of range is ignored.
    pub fn select<D: Dom<Node = N>>(&self, dom: &D, index: usize) {
        let Some(chosen) = self.buttons.get(index) else {
            return;
        };
        for button in &self.buttons {
            dom.remove_class(&button.node, class::ACTIVE);
        }
        dom.add_class(&chosen.node, class::ACTIVE);

        for card in &self.cards {
            if chosen.tag.admits(card.tag.as_ref()) {
                dom.remove_class(&card.node, class::HIDE);
            } else {
                dom.add_class(&card.node, class::HIDE);
            }
        }
        crate::trace!(index, choice = ?chosen.tag, "filter applied");
    }
}
