#![forbid(unsafe_code)]

//! Keyboard focus trap.
//!
//! Constrains Tab/Shift+Tab to cycle within a container. Only the wrap points
//! are handled; every other Tab press keeps its native behavior, so the host
//! must not prevent default unless [`FocusTrap::handle_key`] says so.

use crate::dom::Dom;
use crate::input::{Disposition, KeyCode, KeyInput, Modifiers};

/// An installed focus trap. Holds the wrap points computed at install time.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTrap<N> {
    first: N,
    last: N,
}

impl<N: Clone + PartialEq + core::fmt::Debug> FocusTrap<N> {
    /// Install a trap on `container` and focus its first focusable element.
    ///
    /// Returns `None`, leaving focus untouched, when the container has no
    /// focusable descendants.
    pub fn install<D: Dom<Node = N>>(dom: &D, container: &N) -> Option<Self> {
        let focusable = dom.focusable_descendants(container);
        let first = focusable.first()?.clone();
        let last = focusable.last()?.clone();
        dom.focus(&first);
        crate::trace!(count = focusable.len(), "focus trap installed");
        Some(Self { first, last })
    }

    #[must_use]
    pub fn first(&self) -> &N {
        &self.first
    }

    #[must_use]
    pub fn last(&self) -> &N {
        &self.last
    }

    /// Wrap focus at the ends of the trap.
    pub fn handle_key<D: Dom<Node = N>>(&self, dom: &D, key: &KeyInput) -> Disposition {
        if !key.code.is_tab() {
            return Disposition::empty();
        }
        let backward = key.code == KeyCode::BackTab || key.mods.contains(Modifiers::SHIFT);
        let active = dom.active_element();

        let (edge, wrap_to) = if backward {
            (&self.first, &self.last)
        } else {
            (&self.last, &self.first)
        };
        if active.as_ref() == Some(edge) {
            dom.focus(wrap_to);
            Disposition::PREVENT_DEFAULT
        } else {
            Disposition::empty()
        }
    }

    /// Remove the trap, optionally returning focus to `restore`.
    pub fn release<D: Dom<Node = N>>(self, dom: &D, restore: Option<&N>) {
        if let Some(target) = restore {
            dom.focus(target);
        }
        crate::trace!("focus trap released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::{MemoryDom, NodeId};
    use pretty_assertions::assert_eq;

    fn tab() -> KeyInput {
        KeyInput::plain(KeyCode::Tab)
    }

    fn shift_tab() -> KeyInput {
        KeyInput {
            code: KeyCode::BackTab,
            mods: Modifiers::SHIFT,
            repeat: false,
        }
    }

    fn nav_with_links(dom: &MemoryDom, n: usize) -> (NodeId, Vec<NodeId>) {
        let nav = dom.create("nav").append_to(dom.body());
        let links = (0..n)
            .map(|i| dom.create("a").attr("href", &format!("/p{i}")).append_to(nav))
            .collect();
        (nav, links)
    }

    #[test]
    fn install_focuses_first() {
        let dom = MemoryDom::new();
        let (nav, links) = nav_with_links(&dom, 3);
        let trap = FocusTrap::install(&dom, &nav).expect("trap");
        assert_eq!(dom.focused(), Some(links[0]));
        assert_eq!(trap.first(), &links[0]);
        assert_eq!(trap.last(), &links[2]);
    }

    #[test]
    fn empty_container_is_noop() {
        let dom = MemoryDom::new();
        let nav = dom.create("nav").append_to(dom.body());
        dom.create("span").append_to(nav);
        let outside = dom.create("button").append_to(dom.body());
        dom.focus(&outside);

        assert!(FocusTrap::install(&dom, &nav).is_none());
        assert_eq!(dom.focused(), Some(outside));
    }

    #[test]
    fn tab_on_last_wraps_to_first() {
        let dom = MemoryDom::new();
        let (nav, links) = nav_with_links(&dom, 3);
        let trap = FocusTrap::install(&dom, &nav).expect("trap");

        dom.focus(&links[1]);
        assert_eq!(trap.handle_key(&dom, &tab()), Disposition::empty());

        dom.focus(&links[2]);
        assert_eq!(trap.handle_key(&dom, &tab()), Disposition::PREVENT_DEFAULT);
        assert_eq!(dom.focused(), Some(links[0]));
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        let dom = MemoryDom::new();
        let (nav, links) = nav_with_links(&dom, 2);
        let trap = FocusTrap::install(&dom, &nav).expect("trap");

        assert_eq!(
            trap.handle_key(&dom, &shift_tab()),
            Disposition::PREVENT_DEFAULT
        );
        assert_eq!(dom.focused(), Some(links[1]));
    }

    #[test]
    fn other_keys_pass_through() {
        let dom = MemoryDom::new();
        let (nav, links) = nav_with_links(&dom, 2);
        let trap = FocusTrap::install(&dom, &nav).expect("trap");
        dom.focus(&links[1]);

        let key = KeyInput::plain(KeyCode::Char('x'));
        assert_eq!(trap.handle_key(&dom, &key), Disposition::empty());
        assert_eq!(dom.focused(), Some(links[1]));
    }

    #[test]
    fn release_restores_focus() {
        let dom = MemoryDom::new();
        let opener = dom.create("button").append_to(dom.body());
        let (nav, _) = nav_with_links(&dom, 2);

        let trap = FocusTrap::install(&dom, &nav).expect("trap");
        trap.release(&dom, Some(&opener));
        assert_eq!(dom.focused(), Some(opener));
    }
}
