#![forbid(unsafe_code)]

//! The DOM surface controllers are written against.
//!
//! Every method takes `&self`: browser DOM handles are shared references with
//! interior mutability, and the in-memory implementation mirrors that.

use core::fmt;

use crate::selector::Selector;

/// Selector for elements that take part in a focus trap.
pub const FOCUSABLE_SELECTOR: &str = "a[href], button:not([disabled]), input:not([disabled]), \
     textarea:not([disabled]), select:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// CSS classes toggled by the controllers. Styling is external.
pub mod class {
    pub const OPEN: &str = "open";
    pub const ACTIVE: &str = "active";
    pub const HIDE: &str = "hide";
    pub const VISIBLE: &str = "visible";
    pub const MENU_OPENING: &str = "menu-opening";
}

/// ARIA attribute names kept in sync with open/closed state.
pub mod aria {
    pub const EXPANDED: &str = "aria-expanded";
    pub const HIDDEN: &str = "aria-hidden";
}

/// Render an ARIA boolean.
#[must_use]
pub const fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Host DOM access.
pub trait Dom {
    /// Element handle. Equality is element identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// All matches in document order, below `scope` or the whole document.
    fn query_all(&self, scope: Option<&Self::Node>, selector: &Selector) -> Vec<Self::Node>;

    /// First match in document order.
    fn query(&self, scope: Option<&Self::Node>, selector: &Selector) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Inclusive containment, like `Node.contains`.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// `document.activeElement`.
    fn active_element(&self) -> Option<Self::Node>;
    fn focus(&self, node: &Self::Node);
    /// Whether `node` is still attached and can take focus again.
    fn can_focus(&self, node: &Self::Node) -> bool;

    /// Focusable descendants of `container` in document order
    /// (see [`FOCUSABLE_SELECTOR`] and [`FocusableRules`]).
    fn focusable_descendants(&self, container: &Self::Node) -> Vec<Self::Node>;

    fn set_inner_html(&self, node: &Self::Node, html: &str);

    /// Current resolved source of an image element.
    fn image_source(&self, img: &Self::Node) -> String;
    fn set_image(&self, img: &Self::Node, src: &str, alt: &str);

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
}

/// Focusability rules behind [`FOCUSABLE_SELECTOR`], for hosts without a
/// native selector engine.
#[derive(Debug, Clone, Copy)]
pub struct FocusableRules;

impl FocusableRules {
    /// Decide focusability from a tag name and an attribute lookup.
    pub fn is_focusable<'a>(tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        let tag = tag.to_ascii_lowercase();
        let by_tag = match tag.as_str() {
            "a" => attr("href").is_some(),
            "button" | "input" | "textarea" | "select" => attr("disabled").is_none(),
            _ => false,
        };
        by_tag || attr("tabindex").is_some_and(|t| t.trim() != "-1")
    }
}
