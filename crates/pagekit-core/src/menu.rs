#![forbid(unsafe_code)]

//! Mobile navigation menu.
//!
//! # Invariants
//!
//! 1. `aria-expanded` on the toggle and `aria-hidden` on the nav are written
//!    together on every transition, so open ⇔ (`expanded=true`,
//!    `hidden=false`) and the header carries `open` exactly when open.
//! 2. While open, the nav's focus trap (if it has focusable content) sees
//!    every key press before any other document key handling.
//! 3. The document click that belongs to the opening toggle click never
//!    closes the menu. Identity is compared by [`EventId`], not by time.
//!
//! The `menu-opening` header class is a visual hint only. It is added on
//! open and removed by [`NavMenu::tick`] once the configured window elapsed,
//! or on close.

use core::time::Duration;

use crate::config::{ConfigError, NavConfig, compile};
use crate::dom::{Dom, aria, aria_bool, class};
use crate::focus_trap::FocusTrap;
use crate::input::{Disposition, EventId, KeyCode, KeyInput};

/// Navigation menu controller.
#[derive(Debug)]
pub struct NavMenu<N> {
    toggle: N,
    nav: N,
    header: N,
    links: Vec<N>,
    open_icon: String,
    closed_icon: String,
    opening_window: Duration,
    last_focused: Option<N>,
    trap: Option<FocusTrap<N>>,
    opened_by: Option<EventId>,
    hint_deadline: Option<Duration>,
}

impl<N: Clone + PartialEq + core::fmt::Debug> NavMenu<N> {
    /// Locate the toggle, nav and header. `Ok(None)` if any is missing.
    pub fn mount<D: Dom<Node = N>>(dom: &D, cfg: &NavConfig) -> Result<Option<Self>, ConfigError> {
        let toggle = dom.query(None, &compile("nav.toggle", &cfg.toggle)?);
        let nav = dom.query(None, &compile("nav.container", &cfg.container)?);
        let header = dom.query(None, &compile("nav.header", &cfg.header)?);
        let (Some(toggle), Some(nav), Some(header)) = (toggle, nav, header) else {
            crate::debug!("navigation menu not initialized: toggle, nav or header missing");
            return Ok(None);
        };
        let links = dom.query_all(None, &compile("nav.links", &cfg.links)?);

        dom.set_attribute(&toggle, aria::EXPANDED, aria_bool(false));
        dom.set_attribute(&nav, aria::HIDDEN, aria_bool(true));
        crate::debug!(links = links.len(), "navigation menu initialized");

        Ok(Some(Self {
            toggle,
            nav,
            header,
            links,
            open_icon: cfg.open_icon.clone(),
            closed_icon: cfg.closed_icon.clone(),
            opening_window: cfg.opening_guard(),
            last_focused: None,
            trap: None,
            opened_by: None,
            hint_deadline: None,
        }))
    }

    #[must_use]
    pub fn toggle(&self) -> &N {
        &self.toggle
    }

    #[must_use]
    pub fn links(&self) -> &[N] {
        &self.links
    }

    /// Open state as published through `aria-expanded`.
    pub fn is_open<D: Dom<Node = N>>(&self, dom: &D) -> bool {
        dom.attribute(&self.toggle, aria::EXPANDED).as_deref() == Some("true")
    }

    /// Open the menu. `event` is the DOM event that caused it, if any.
    pub fn open<D: Dom<Node = N>>(&mut self, dom: &D, event: Option<EventId>, now: Duration) {
        self.last_focused = dom.active_element();
        dom.add_class(&self.header, class::OPEN);
        self.set_aria(dom, true);
        dom.set_inner_html(&self.toggle, &self.open_icon);
        self.trap = FocusTrap::install(dom, &self.nav);

        self.opened_by = event;
        dom.add_class(&self.header, class::MENU_OPENING);
        self.hint_deadline = Some(now.saturating_add(self.opening_window));
        crate::trace!(?event, "menu opened");
    }

    /// Close the menu and restore focus to where it was before opening.
    pub fn close<D: Dom<Node = N>>(&mut self, dom: &D) {
        dom.remove_class(&self.header, class::OPEN);
        self.set_aria(dom, false);
        dom.set_inner_html(&self.toggle, &self.closed_icon);

        let restore = self
            .last_focused
            .take()
            .filter(|node| dom.can_focus(node));
        match self.trap.take() {
            Some(trap) => trap.release(dom, restore.as_ref()),
            None => {
                if let Some(node) = &restore {
                    dom.focus(node);
                }
            }
        }

        self.opened_by = None;
        self.clear_hint(dom);
        crate::trace!("menu closed");
    }

    fn set_aria<D: Dom<Node = N>>(&self, dom: &D, open: bool) {
        dom.set_attribute(&self.toggle, aria::EXPANDED, aria_bool(open));
        dom.set_attribute(&self.nav, aria::HIDDEN, aria_bool(!open));
    }

    fn clear_hint<D: Dom<Node = N>>(&mut self, dom: &D) {
        if self.hint_deadline.take().is_some() {
            dom.remove_class(&self.header, class::MENU_OPENING);
        }
    }

    /// Toggle button click. The click must not reach the document handler.
    pub fn on_toggle_click<D: Dom<Node = N>>(
        &mut self,
        dom: &D,
        event: EventId,
        now: Duration,
    ) -> Disposition {
        if self.is_open(dom) {
            self.close(dom);
        } else {
            self.open(dom, Some(event), now);
        }
        Disposition::STOP_PROPAGATION
    }

    /// Click on a navigation link.
    pub fn on_link_click<D: Dom<Node = N>>(&mut self, dom: &D) -> Disposition {
        if self.is_open(dom) {
            self.close(dom);
        }
        Disposition::empty()
    }

    /// Document-level key handling: the focus trap, then Escape.
    pub fn on_key<D: Dom<Node = N>>(&mut self, dom: &D, key: &KeyInput) -> Disposition {
        if !self.is_open(dom) {
            return Disposition::empty();
        }
        if key.code == KeyCode::Escape {
            self.close(dom);
            return Disposition::empty();
        }
        match &self.trap {
            Some(trap) => trap.handle_key(dom, key),
            None => Disposition::empty(),
        }
    }

    /// Document-level click: close when the click landed outside the header.
    pub fn on_document_click<D: Dom<Node = N>>(
        &mut self,
        dom: &D,
        event: EventId,
        target: Option<&N>,
    ) -> Disposition {
        if !self.is_open(dom) || self.opened_by == Some(event) {
            return Disposition::empty();
        }
        if target.is_some_and(|t| dom.contains(&self.header, t)) {
            return Disposition::empty();
        }
        self.close(dom);
        Disposition::empty()
    }

    /// When the `menu-opening` hint should be cleared, if pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.hint_deadline
    }

    /// Advance the host clock.
    pub fn tick<D: Dom<Node = N>>(&mut self, dom: &D, now: Duration) {
        if self.hint_deadline.is_some_and(|deadline| now >= deadline) {
            self.clear_hint(dom);
        }
    }
}
