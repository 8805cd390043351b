//! Property-based invariant tests for the page controllers.
//!
//! Verifies:
//! 1. ARIA consistency: after any sequence of menu operations,
//!    open ⇔ aria-expanded=true ⇔ aria-hidden=false ⇔ header has `open`
//! 2. Focus containment: while the menu is open, Tab/Shift+Tab never move
//!    focus outside the nav (native moves are simulated in document order)
//! 3. Filter exactness: after clicking button X, visible cards are exactly
//!    those of category X (all for `all`), and exactly one button is active
//! 4. Lightbox modular navigation: N × next from i lands on (i+N) mod L and
//!    N × prev returns to i
//! 5. Swipe threshold: navigation happens iff |dx| > 40, left ⇒ next
//! 6. Determinism: the same operation sequence yields the same DOM state

use std::time::Duration;

use pagekit_core::dom::{aria, class};
use pagekit_core::memory_dom::{MemoryDom, NodeId};
use pagekit_core::{
    Disposition, Dom, DomEvent, EventId, KeyCode, KeyInput, Listener, Modifiers, Site,
    SiteConfig, TouchInput, TouchPhase,
};
use proptest::prelude::*;

// ── Fixtures ──────────────────────────────────────────────────────────

struct Page {
    header: NodeId,
    toggle: NodeId,
    nav: NodeId,
    outside: NodeId,
    buttons: Vec<NodeId>,
    cards: Vec<(NodeId, String)>,
}

const CATEGORIES: [&str; 3] = ["anime", "music", "games"];

fn build(dom: &MemoryDom, nav_links: usize, card_categories: &[usize], gallery: usize) -> Page {
    let header = dom.create("header").append_to(dom.body());
    let toggle = dom.create("button").id("nav-toggle").append_to(header);
    let nav = dom.create("nav").id("site-navigation").append_to(header);
    for i in 0..nav_links {
        dom.create("a")
            .attr("href", &format!("/p{i}"))
            .append_to(nav);
    }
    let outside = dom.create("a").attr("href", "/out").append_to(dom.body());
    dom.create("input").append_to(dom.body());

    let bar = dom.create("div").append_to(dom.body());
    let buttons = std::iter::once("all")
        .chain(CATEGORIES)
        .map(|c| {
            dom.create("button")
                .class("filter-btn")
                .attr("data-type", c)
                .append_to(bar)
        })
        .collect();
    let cards = card_categories
        .iter()
        .map(|&c| {
            let category = CATEGORIES[c].to_string();
            let node = dom
                .create("article")
                .class("event-card")
                .attr("data-type", &category)
                .append_to(bar);
            (node, category)
        })
        .collect();

    let g = dom.create("div").class("gallery").append_to(dom.body());
    for i in 0..gallery {
        dom.create("img")
            .attr("src", &format!("t{i}.jpg"))
            .append_to(g);
    }
    let lightbox = dom.create("div").id("lightbox").append_to(dom.body());
    let content = dom
        .create("div")
        .class("lightbox-content")
        .append_to(lightbox);
    dom.create("img").id("lb-img").append_to(content);

    Page {
        header,
        toggle,
        nav,
        outside,
        buttons,
        cards,
    }
}

fn mount(nav_links: usize, cards: &[usize], gallery: usize) -> (Site<MemoryDom>, Page) {
    let dom = MemoryDom::new();
    let page = build(&dom, nav_links, cards, gallery);
    let site = Site::mount(dom, &SiteConfig::default()).expect("mount");
    (site, page)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── Strategy helpers ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum MenuOp {
    ToggleClick,
    OutsideClick,
    InsideClick,
    LinkClick,
    Escape,
    Tab,
    Tick(u16),
}

fn arb_menu_op() -> impl Strategy<Value = MenuOp> {
    prop_oneof![
        Just(MenuOp::ToggleClick),
        Just(MenuOp::OutsideClick),
        Just(MenuOp::InsideClick),
        Just(MenuOp::LinkClick),
        Just(MenuOp::Escape),
        Just(MenuOp::Tab),
        (0u16..500).prop_map(MenuOp::Tick),
    ]
}

fn apply(site: &mut Site<MemoryDom>, page: &Page, op: MenuOp, id: u64, now: Duration) {
    let click = |target: NodeId| DomEvent::Click {
        id: EventId(id),
        target: Some(target),
    };
    match op {
        MenuOp::ToggleClick => {
            site.dispatch(Listener::MenuToggle, &click(page.toggle), now);
        }
        MenuOp::OutsideClick => {
            site.dispatch(Listener::DocumentClick, &click(page.outside), now);
        }
        MenuOp::InsideClick => {
            site.dispatch(Listener::DocumentClick, &click(page.header), now);
        }
        MenuOp::LinkClick => {
            let link = site.menu().and_then(|m| m.links().first().copied());
            if let Some(link) = link {
                site.dispatch(Listener::NavLink, &click(link), now);
                site.dispatch(Listener::DocumentClick, &click(link), now);
            }
        }
        MenuOp::Escape => {
            site.dispatch(
                Listener::DocumentKey,
                &DomEvent::Key(KeyInput::plain(KeyCode::Escape)),
                now,
            );
        }
        MenuOp::Tab => {
            site.dispatch(
                Listener::DocumentKey,
                &DomEvent::Key(KeyInput::plain(KeyCode::Tab)),
                now,
            );
        }
        MenuOp::Tick(_) => site.tick(now),
    }
}

fn aria_state(site: &Site<MemoryDom>, page: &Page) -> (Option<String>, Option<String>, bool) {
    let dom = site.dom();
    (
        dom.attribute(&page.toggle, aria::EXPANDED),
        dom.attribute(&page.nav, aria::HIDDEN),
        dom.has_class(&page.header, class::OPEN),
    )
}

/// Browser default for an unhandled Tab: next/previous focusable in document order.
fn native_tab(dom: &MemoryDom, backward: bool) {
    let order = dom.focusable_descendants(&dom.body());
    if order.is_empty() {
        return;
    }
    let pos = dom
        .focused()
        .and_then(|f| order.iter().position(|&n| n == f));
    let next = match (pos, backward) {
        (Some(p), false) => (p + 1) % order.len(),
        (Some(p), true) => (p + order.len() - 1) % order.len(),
        (None, false) => 0,
        (None, true) => order.len() - 1,
    };
    dom.focus(&order[next]);
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn aria_always_matches_open_state(ops in prop::collection::vec(arb_menu_op(), 0..40)) {
        let (mut site, page) = mount(3, &[], 0);
        let mut now = Duration::ZERO;
        for (i, op) in ops.into_iter().enumerate() {
            if let MenuOp::Tick(dt) = op {
                now += ms(u64::from(dt));
            }
            apply(&mut site, &page, op, i as u64, now);

            let open = site.menu_open();
            let (expanded, hidden, header_open) = aria_state(&site, &page);
            prop_assert_eq!(expanded.as_deref(), Some(if open { "true" } else { "false" }));
            prop_assert_eq!(hidden.as_deref(), Some(if open { "false" } else { "true" }));
            prop_assert_eq!(header_open, open);
        }
    }

    #[test]
    fn tab_never_escapes_open_nav(
        links in 1usize..6,
        presses in prop::collection::vec(any::<bool>(), 1..40),
    ) {
        let (mut site, page) = mount(links, &[], 0);
        site.open_menu(Duration::ZERO);

        for backward in presses {
            let key = if backward {
                KeyInput { code: KeyCode::BackTab, mods: Modifiers::SHIFT, repeat: false }
            } else {
                KeyInput::plain(KeyCode::Tab)
            };
            let d = site.dispatch(Listener::DocumentKey, &DomEvent::Key(key), Duration::ZERO);
            if !d.contains(Disposition::PREVENT_DEFAULT) {
                native_tab(site.dom(), backward);
            }
            let focused = site.dom().focused();
            prop_assert!(
                focused.is_some_and(|f| site.dom().contains(&page.nav, &f)),
                "focus escaped to {:?}", focused
            );
        }
    }

    #[test]
    fn filter_shows_exactly_matching_cards(
        cards in prop::collection::vec(0usize..3, 0..12),
        clicks in prop::collection::vec(0usize..4, 1..8),
    ) {
        let (mut site, page) = mount(1, &cards, 0);
        for button in clicks {
            let target = page.buttons[button];
            site.dispatch(
                Listener::FilterButton(button),
                &DomEvent::Click { id: EventId(0), target: Some(target) },
                Duration::ZERO,
            );

            let dom = site.dom();
            for (node, category) in &page.cards {
                let expected = button == 0 || category.as_str() == CATEGORIES[button - 1];
                prop_assert_eq!(!dom.has_class(node, class::HIDE), expected);
            }
            let active: Vec<_> = page
                .buttons
                .iter()
                .filter(|b| dom.has_class(b, class::ACTIVE))
                .collect();
            prop_assert_eq!(active, vec![&target]);
        }
    }

    #[test]
    fn lightbox_navigation_is_modular(len in 1usize..10, start in 0usize..10, n in 0usize..30) {
        let start = start % len;
        let (mut site, _page) = mount(1, &[], len);
        site.open_lightbox_at(start);
        let right = DomEvent::Key(KeyInput::plain(KeyCode::Right));
        let left = DomEvent::Key(KeyInput::plain(KeyCode::Left));

        for _ in 0..n {
            site.dispatch(Listener::DocumentKey, &right, Duration::ZERO);
        }
        prop_assert_eq!(site.lightbox().and_then(|lb| lb.current()), Some((start + n) % len));

        for _ in 0..n {
            site.dispatch(Listener::DocumentKey, &left, Duration::ZERO);
        }
        prop_assert_eq!(site.lightbox().and_then(|lb| lb.current()), Some(start));
    }

    #[test]
    fn swipe_navigates_only_past_threshold(dx in -200.0f64..200.0) {
        let (mut site, _page) = mount(1, &[], 5);
        site.open_lightbox_at(2);
        let start = DomEvent::Touch(TouchInput::single(TouchPhase::Start, 400.0, 0.0));
        let end = DomEvent::Touch(TouchInput::single(TouchPhase::End, 400.0 + dx, 0.0));
        site.dispatch(Listener::LightboxTouch, &start, Duration::ZERO);
        site.dispatch(Listener::LightboxTouch, &end, Duration::ZERO);

        let expected = if dx.abs() <= 40.0 {
            2
        } else if dx < 0.0 {
            3
        } else {
            1
        };
        prop_assert_eq!(site.lightbox().and_then(|lb| lb.current()), Some(expected));
    }

    #[test]
    fn same_ops_same_state(ops in prop::collection::vec(arb_menu_op(), 0..30)) {
        let run = |ops: &[MenuOp]| {
            let (mut site, page) = mount(2, &[], 0);
            for (i, &op) in ops.iter().enumerate() {
                apply(&mut site, &page, op, i as u64, ms(i as u64 * 100));
            }
            (aria_state(&site, &page), site.dom().focused(), site.next_deadline())
        };
        prop_assert_eq!(run(&ops), run(&ops));
    }
}

#[test]
fn fifty_px_left_swipe_advances_one_twenty_does_nothing() {
    let (mut site, _page) = mount(1, &[], 3);
    site.open_lightbox_at(0);
    let swipe = |site: &mut Site<MemoryDom>, dx: f64| {
        site.dispatch(
            Listener::LightboxTouch,
            &DomEvent::Touch(TouchInput::single(TouchPhase::Start, 100.0, 0.0)),
            Duration::ZERO,
        );
        site.dispatch(
            Listener::LightboxTouch,
            &DomEvent::Touch(TouchInput::single(TouchPhase::End, 100.0 + dx, 0.0)),
            Duration::ZERO,
        );
    };

    swipe(&mut site, -50.0);
    assert_eq!(site.lightbox().and_then(|lb| lb.current()), Some(1));
    swipe(&mut site, -20.0);
    assert_eq!(site.lightbox().and_then(|lb| lb.current()), Some(1));
}
