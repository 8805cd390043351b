#![forbid(unsafe_code)]

//! In-memory [`Dom`] implementation.
//!
//! Enough of a document for controllers to run outside a browser: a tree of
//! elements with attributes and classes, a focused element, and the
//! focusability rules of [`FocusableRules`]. Used by this crate's tests and
//! available to hosts that want to test their markup contract natively.
//!
//! ```
//! use pagekit_core::memory_dom::MemoryDom;
//!
//! let dom = MemoryDom::new();
//! let nav = dom.create("nav").id("site-navigation").append_to(dom.body());
//! let link = dom.create("a").attr("href", "/").append_to(nav);
//! assert_eq!(dom.parent(link), Some(nav));
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::dom::{Dom, FocusableRules};
use crate::selector::{Selector, SelectorTarget};

/// Element handle into a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    inner_html: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Inner {
    nodes: Vec<ElementData>,
    focused: Option<NodeId>,
}

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

impl Inner {
    fn get(&self, id: NodeId) -> &ElementData {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut ElementData {
        &mut self.nodes[id.0]
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node == ROOT {
                return true;
            }
            cur = self.get(node).parent;
        }
        false
    }

    fn is_focusable(&self, id: NodeId) -> bool {
        let el = self.get(id);
        FocusableRules::is_focusable(&el.tag, |name| el.attrs.get(name).map(String::as_str))
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.get(scope).children {
            out.push(child);
            self.descendants(child, out);
        }
    }
}

struct ElementRef<'a> {
    inner: &'a Inner,
    id: NodeId,
}

impl SelectorTarget for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        &self.inner.get(self.id).tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.inner.get(self.id).attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.inner.get(self.id).classes.iter().any(|c| c == class)
    }

    fn parent(&self) -> Option<Self> {
        self.inner.get(self.id).parent.map(|id| ElementRef {
            inner: self.inner,
            id,
        })
    }
}

/// A small mutable document: `<html><body>...</body></html>`.
#[derive(Debug)]
pub struct MemoryDom {
    inner: RefCell<Inner>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        let html = ElementData {
            tag: "html".into(),
            children: vec![BODY],
            ..ElementData::default()
        };
        let body = ElementData {
            tag: "body".into(),
            parent: Some(ROOT),
            ..ElementData::default()
        };
        Self {
            inner: RefCell::new(Inner {
                nodes: vec![html, body],
                focused: None,
            }),
        }
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        BODY
    }

    /// Start building a detached element.
    #[must_use]
    pub fn create(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            dom: self,
            data: ElementData {
                tag: tag.to_ascii_lowercase(),
                ..ElementData::default()
            },
        }
    }

    /// Remove `node` (and its subtree) from the document.
    pub fn detach(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if let Some(parent) = inner.get_mut(node).parent.take() {
            inner.get_mut(parent).children.retain(|&c| c != node);
        }
        if inner.focused.is_some_and(|f| !inner.is_attached(f)) {
            inner.focused = None;
        }
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().get(node).parent
    }

    /// The focused element, `None` meaning the body.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.inner.borrow().focused
    }

    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.inner.borrow().get(node).classes.clone()
    }

    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.inner.borrow().get(node).inner_html.clone()
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner.borrow().get(node).styles.get(property).cloned()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let mut all = Vec::new();
        inner.descendants(scope.copied().unwrap_or(ROOT), &mut all);
        all.into_iter()
            .filter(|&id| {
                selector.matches(&ElementRef {
                    inner: &inner,
                    id,
                })
            })
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner.borrow().get(*node).attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .get_mut(*node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.inner.borrow().get(*node).classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut inner = self.inner.borrow_mut();
        let classes = &mut inner.get_mut(*node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.inner
            .borrow_mut()
            .get_mut(*node)
            .classes
            .retain(|c| c != class);
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let inner = self.inner.borrow();
        let mut cur = Some(*node);
        while let Some(id) = cur {
            if id == *ancestor {
                return true;
            }
            cur = inner.get(id).parent;
        }
        false
    }

    fn active_element(&self) -> Option<NodeId> {
        Some(self.inner.borrow().focused.unwrap_or(BODY))
    }

    fn focus(&self, node: &NodeId) {
        let mut inner = self.inner.borrow_mut();
        if inner.is_attached(*node) && inner.is_focusable(*node) {
            inner.focused = Some(*node);
        }
    }

    fn can_focus(&self, node: &NodeId) -> bool {
        let inner = self.inner.borrow();
        inner.is_attached(*node) && inner.is_focusable(*node)
    }

    fn focusable_descendants(&self, container: &NodeId) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let mut all = Vec::new();
        inner.descendants(*container, &mut all);
        all.retain(|&id| inner.is_focusable(id));
        all
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.inner.borrow_mut().get_mut(*node).inner_html = html.to_string();
    }

    fn image_source(&self, img: &NodeId) -> String {
        self.attribute(img, "src").unwrap_or_default()
    }

    fn set_image(&self, img: &NodeId, src: &str, alt: &str) {
        self.set_attribute(img, "src", src);
        self.set_attribute(img, "alt", alt);
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.inner
            .borrow_mut()
            .get_mut(*node)
            .styles
            .insert(property.to_string(), value.to_string());
    }
}

/// Builder returned by [`MemoryDom::create`].
#[must_use = "call append_to to insert the element"]
pub struct ElementBuilder<'a> {
    dom: &'a MemoryDom,
    data: ElementData,
}

impl ElementBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.data.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.data.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn append_to(self, parent: NodeId) -> NodeId {
        let mut inner = self.dom.inner.borrow_mut();
        let id = NodeId(inner.nodes.len());
        let mut data = self.data;
        data.parent = Some(parent);
        inner.nodes.push(data);
        inner.get_mut(parent).children.push(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).expect("selector")
    }

    #[test]
    fn query_all_returns_document_order() {
        let dom = MemoryDom::new();
        let gallery = dom.create("div").class("gallery").append_to(dom.body());
        let a = dom.create("img").attr("src", "a.jpg").append_to(gallery);
        let fig = dom.create("figure").append_to(gallery);
        let b = dom.create("img").attr("src", "b.jpg").append_to(fig);
        let _outside = dom.create("img").append_to(dom.body());

        assert_eq!(dom.query_all(None, &sel(".gallery img")), vec![a, b]);
        assert_eq!(dom.query(Some(&fig), &sel("img")), Some(b));
    }

    #[test]
    fn focus_ignores_unfocusable_and_detached() {
        let dom = MemoryDom::new();
        let div = dom.create("div").append_to(dom.body());
        let button = dom.create("button").append_to(dom.body());

        dom.focus(&div);
        assert_eq!(dom.focused(), None);
        assert_eq!(dom.active_element(), Some(dom.body()));

        dom.focus(&button);
        assert_eq!(dom.focused(), Some(button));

        dom.detach(button);
        assert_eq!(dom.focused(), None);
        assert!(!dom.can_focus(&button));
        dom.focus(&button);
        assert_eq!(dom.focused(), None);
    }

    #[test]
    fn contains_is_inclusive() {
        let dom = MemoryDom::new();
        let header = dom.create("header").append_to(dom.body());
        let button = dom.create("button").append_to(header);
        assert!(dom.contains(&header, &header));
        assert!(dom.contains(&header, &button));
        assert!(!dom.contains(&button, &header));
    }

    #[test]
    fn classes_are_a_set() {
        let dom = MemoryDom::new();
        let card = dom.create("div").class("card").append_to(dom.body());
        dom.add_class(&card, "open");
        dom.add_class(&card, "open");
        assert_eq!(dom.classes(card), vec!["card", "open"]);
        dom.remove_class(&card, "open");
        assert!(!dom.has_class(&card, "open"));
    }
}
