#![forbid(unsafe_code)]

//! The page: every controller behind one entry point.
//!
//! [`Site::mount`] reads the document once and builds each controller
//! independently; a controller whose required elements are missing stays
//! inactive without affecting the others. [`Site::bindings`] lists the
//! listeners the host must register, and [`Site::dispatch`] routes a fired
//! listener to its controller.
//!
//! Document-level key handling runs in a fixed order: focus trap, menu
//! Escape, lightbox arrows, lightbox Escape.

use core::time::Duration;

use crate::card_tap::CardReveal;
use crate::config::{ConfigError, SiteConfig};
use crate::dom::Dom;
use crate::filter::CategoryFilter;
use crate::input::{Disposition, EventId, InputEvent, KeyInput, TouchInput};
use crate::lightbox::Lightbox;
use crate::menu::NavMenu;

/// DOM event types the page listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    TouchStart,
    TouchEnd,
    TouchCancel,
}

impl EventKind {
    /// Name for `addEventListener`.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
        }
    }
}

/// Which handler a registered listener feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    MenuToggle,
    NavLink,
    DocumentClick,
    DocumentKey,
    FilterButton(usize),
    Thumbnail(usize),
    LightboxPrev,
    LightboxNext,
    LightboxClose,
    LightboxBackdrop,
    LightboxTouch,
    CardTouch(usize),
}

/// Where a listener is registered.
#[derive(Debug, Clone, PartialEq)]
pub enum Target<N> {
    Document,
    Element(N),
}

/// One listener registration the host must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<N> {
    pub target: Target<N>,
    pub kind: EventKind,
    pub listener: Listener,
    /// Register as passive (the handler never prevents default).
    pub passive: bool,
}

impl<N> Binding<N> {
    fn new(target: Target<N>, kind: EventKind, listener: Listener) -> Self {
        Self {
            target,
            kind,
            listener,
            passive: false,
        }
    }

    fn passive(mut self) -> Self {
        self.passive = true;
        self
    }
}

/// A fired DOM event, normalized by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent<N> {
    Click { id: EventId, target: Option<N> },
    Key(KeyInput),
    Touch(TouchInput),
}

impl<N> DomEvent<N> {
    /// Key and touch payloads, for tracing.
    #[must_use]
    pub fn as_input(&self) -> Option<InputEvent> {
        match self {
            Self::Click { .. } => None,
            Self::Key(key) => Some(InputEvent::Key(key.clone())),
            Self::Touch(touch) => Some(InputEvent::Touch(touch.clone())),
        }
    }
}

/// All page controllers over one document.
#[derive(Debug)]
pub struct Site<D: Dom> {
    dom: D,
    menu: Option<NavMenu<D::Node>>,
    filter: Option<CategoryFilter<D::Node>>,
    lightbox: Option<Lightbox<D::Node>>,
    cards: CardReveal<D::Node>,
}

impl<D: Dom> Site<D> {
    /// Read the document and initialize every controller that can be.
    pub fn mount(dom: D, cfg: &SiteConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let menu = NavMenu::mount(&dom, &cfg.nav)?;
        let filter = CategoryFilter::mount(&dom, &cfg.filter)?;
        let lightbox = Lightbox::mount(&dom, &cfg.lightbox)?;
        let cards = CardReveal::mount(&dom, &cfg.cards)?;
        crate::info!(
            menu = menu.is_some(),
            filter = filter.is_some(),
            lightbox = lightbox.is_some(),
            "site mounted"
        );
        Ok(Self {
            dom,
            menu,
            filter,
            lightbox,
            cards,
        })
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    #[must_use]
    pub fn menu(&self) -> Option<&NavMenu<D::Node>> {
        self.menu.as_ref()
    }

    #[must_use]
    pub fn filter(&self) -> Option<&CategoryFilter<D::Node>> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn lightbox(&self) -> Option<&Lightbox<D::Node>> {
        self.lightbox.as_ref()
    }

    #[must_use]
    pub fn cards(&self) -> &CardReveal<D::Node> {
        &self.cards
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(|m| m.is_open(&self.dom))
    }

    /// Open the menu outside of any DOM event.
    pub fn open_menu(&mut self, now: Duration) {
        if let Some(menu) = &mut self.menu
            && !menu.is_open(&self.dom)
        {
            menu.open(&self.dom, None, now);
        }
    }

    pub fn close_menu(&mut self) {
        if let Some(menu) = &mut self.menu
            && menu.is_open(&self.dom)
        {
            menu.close(&self.dom);
        }
    }

    pub fn open_lightbox_at(&mut self, index: usize) {
        if let Some(lightbox) = &mut self.lightbox {
            lightbox.open_at(&self.dom, index);
        }
    }

    pub fn close_lightbox(&mut self) {
        if let Some(lightbox) = &mut self.lightbox
            && lightbox.is_open()
        {
            lightbox.close(&self.dom);
        }
    }

    pub fn select_filter(&mut self, index: usize) {
        if let Some(filter) = &self.filter {
            filter.select(&self.dom, index);
        }
    }

    /// Every listener registration, in the order handlers must run.
    #[must_use]
    pub fn bindings(&self) -> Vec<Binding<D::Node>> {
        use EventKind::{Click, KeyDown, TouchCancel, TouchEnd, TouchStart};

        let mut out = Vec::new();
        if let Some(menu) = &self.menu {
            out.push(Binding::new(
                Target::Element(menu.toggle().clone()),
                Click,
                Listener::MenuToggle,
            ));
            for link in menu.links() {
                out.push(Binding::new(
                    Target::Element(link.clone()),
                    Click,
                    Listener::NavLink,
                ));
            }
            out.push(Binding::new(
                Target::Document,
                Click,
                Listener::DocumentClick,
            ));
        }

        if let Some(filter) = &self.filter {
            for (i, button) in filter.buttons().enumerate() {
                out.push(Binding::new(
                    Target::Element(button.clone()),
                    Click,
                    Listener::FilterButton(i),
                ));
            }
        }

        if let Some(lightbox) = &self.lightbox {
            let parts = lightbox.parts();
            let optional = [
                (&parts.prev, Listener::LightboxPrev),
                (&parts.next, Listener::LightboxNext),
                (&parts.close, Listener::LightboxClose),
                (&parts.backdrop, Listener::LightboxBackdrop),
            ];
            for (node, listener) in optional {
                if let Some(node) = node {
                    out.push(Binding::new(Target::Element(node.clone()), Click, listener));
                }
            }
            if let Some(content) = &parts.content {
                let target = Target::Element(content.clone());
                out.push(
                    Binding::new(target.clone(), TouchStart, Listener::LightboxTouch).passive(),
                );
                out.push(Binding::new(target.clone(), TouchEnd, Listener::LightboxTouch));
                out.push(Binding::new(target, TouchCancel, Listener::LightboxTouch).passive());
            }
            for (i, image) in lightbox.gallery().iter().enumerate() {
                out.push(Binding::new(
                    Target::Element(image.thumbnail.clone()),
                    Click,
                    Listener::Thumbnail(i),
                ));
            }
        }

        for (i, card) in self.cards.cards().iter().enumerate() {
            out.push(Binding::new(
                Target::Element(card.clone()),
                TouchStart,
                Listener::CardTouch(i),
            ));
        }

        if self.menu.is_some() || self.lightbox.is_some() {
            out.push(Binding::new(Target::Document, KeyDown, Listener::DocumentKey));
        }
        out
    }

    /// Route a fired listener. Mismatched event payloads are ignored.
    pub fn dispatch(
        &mut self,
        listener: Listener,
        event: &DomEvent<D::Node>,
        now: Duration,
    ) -> Disposition {
        self.tick(now);
        #[cfg(feature = "tracing")]
        if let Some(input) = event.as_input()
            && let Ok(json) = input.to_json_string()
        {
            crate::trace!(?listener, input = %json, "dispatch");
        }

        let dom = &self.dom;
        match (listener, event) {
            (Listener::MenuToggle, DomEvent::Click { id, .. }) => self
                .menu
                .as_mut()
                .map_or(Disposition::empty(), |m| m.on_toggle_click(dom, *id, now)),
            (Listener::NavLink, DomEvent::Click { .. }) => self
                .menu
                .as_mut()
                .map_or(Disposition::empty(), |m| m.on_link_click(dom)),
            (Listener::DocumentClick, DomEvent::Click { id, target }) => {
                self.menu.as_mut().map_or(Disposition::empty(), |m| {
                    m.on_document_click(dom, *id, target.as_ref())
                })
            }
            (Listener::DocumentKey, DomEvent::Key(key)) => {
                let mut out = Disposition::empty();
                if let Some(menu) = &mut self.menu {
                    out |= menu.on_key(dom, key);
                }
                if let Some(lightbox) = &mut self.lightbox {
                    out |= lightbox.on_key(dom, key);
                }
                out
            }
            (Listener::FilterButton(i), DomEvent::Click { .. }) => {
                if let Some(filter) = &self.filter {
                    filter.select(dom, i);
                }
                Disposition::empty()
            }
            (Listener::Thumbnail(i), DomEvent::Click { .. }) => self
                .lightbox
                .as_mut()
                .map_or(Disposition::empty(), |lb| lb.on_thumbnail_click(dom, i)),
            (Listener::LightboxPrev, DomEvent::Click { .. }) => self
                .lightbox
                .as_mut()
                .map_or(Disposition::empty(), |lb| lb.on_prev_click(dom)),
            (Listener::LightboxNext, DomEvent::Click { .. }) => self
                .lightbox
                .as_mut()
                .map_or(Disposition::empty(), |lb| lb.on_next_click(dom)),
            (Listener::LightboxClose | Listener::LightboxBackdrop, DomEvent::Click { .. }) => self
                .lightbox
                .as_mut()
                .map_or(Disposition::empty(), |lb| lb.on_dismiss_click(dom)),
            (Listener::LightboxTouch, DomEvent::Touch(touch)) => self
                .lightbox
                .as_mut()
                .map_or(Disposition::empty(), |lb| lb.on_touch(dom, touch)),
            (Listener::CardTouch(i), DomEvent::Touch(_)) => self.cards.on_touch_start(dom, i),
            _ => {
                crate::warn!(?listener, "event payload does not match listener");
                Disposition::empty()
            }
        }
    }

    /// Earliest pending timer deadline on the host clock.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.menu.as_ref().and_then(NavMenu::next_deadline)
    }

    /// Advance the host clock, firing due timers.
    pub fn tick(&mut self, now: Duration) {
        if let Some(menu) = &mut self.menu {
            menu.tick(&self.dom, now);
        }
    }
}
