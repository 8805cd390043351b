#![forbid(unsafe_code)]

use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Function;
use pagekit_core::dom::FOCUSABLE_SELECTOR;
use pagekit_core::input::TouchPoint;
use pagekit_core::selector::Selector;
use pagekit_core::{
    Binding, Disposition, Dom, DomEvent, EventId, EventKind, KeyInput, Modifiers, Site,
    SiteConfig, Target, TouchInput, TouchPhase,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget,
    HtmlElement, HtmlImageElement, KeyboardEvent, NodeList, TouchEvent, Window,
};

use crate::error::{WebError, parse_options};

/// [`Dom`] over the live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Vec<Element> {
    let list = match list {
        Ok(list) => list,
        Err(err) => {
            pagekit_core::warn!(selector, error = ?err, "querySelectorAll failed");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_js_error(result: Result<(), JsValue>, what: &'static str) {
    if let Err(err) = result {
        pagekit_core::warn!(what, error = ?err, "DOM call failed");
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_all(&self, scope: Option<&Element>, selector: &Selector) -> Vec<Element> {
        let css = selector.as_str();
        match scope {
            Some(scope) => elements(scope.query_selector_all(css), css),
            None => elements(self.document.query_selector_all(css), css),
        }
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        log_js_error(node.set_attribute(name, value), "setAttribute");
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        log_js_error(node.class_list().add_1(class), "classList.add");
    }

    fn remove_class(&self, node: &Element, class: &str) {
        log_js_error(node.class_list().remove_1(class), "classList.remove");
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node))
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            log_js_error(el.focus(), "focus");
        }
    }

    fn can_focus(&self, node: &Element) -> bool {
        node.is_connected() && node.dyn_ref::<HtmlElement>().is_some()
    }

    fn focusable_descendants(&self, container: &Element) -> Vec<Element> {
        elements(
            container.query_selector_all(FOCUSABLE_SELECTOR),
            FOCUSABLE_SELECTOR,
        )
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn image_source(&self, img: &Element) -> String {
        match img.dyn_ref::<HtmlImageElement>() {
            Some(img) => img.src(),
            None => img.get_attribute("src").unwrap_or_default(),
        }
    }

    fn set_image(&self, img: &Element, src: &str, alt: &str) {
        match img.dyn_ref::<HtmlImageElement>() {
            Some(img) => {
                img.set_src(src);
                img.set_alt(alt);
            }
            None => {
                self.set_attribute(img, "src", src);
                self.set_attribute(img, "alt", alt);
            }
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            log_js_error(el.style().set_property(property, value), "style.setProperty");
        }
    }
}

// ---------------------------------------------------------------------------
// Event translation
// ---------------------------------------------------------------------------

fn translate(kind: EventKind, event: &Event) -> Option<DomEvent<Element>> {
    match kind {
        EventKind::Click => Some(DomEvent::Click {
            // Every listener of one dispatch observes the same timeStamp.
            id: EventId(event.time_stamp().to_bits()),
            target: event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok()),
        }),
        EventKind::KeyDown => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            let mods = Modifiers::from_dom(
                key.shift_key(),
                key.alt_key(),
                key.ctrl_key(),
                key.meta_key(),
            );
            Some(DomEvent::Key(KeyInput::from_dom(
                &key.key(),
                &key.code(),
                mods,
                key.repeat(),
            )))
        }
        EventKind::TouchStart | EventKind::TouchEnd | EventKind::TouchCancel => {
            let touch = event.dyn_ref::<TouchEvent>()?;
            let phase = match kind {
                EventKind::TouchStart => TouchPhase::Start,
                EventKind::TouchEnd => TouchPhase::End,
                _ => TouchPhase::Cancel,
            };
            let list = touch.changed_touches();
            let changed = (0..list.length())
                .filter_map(|i| list.item(i))
                .map(|t| TouchPoint {
                    id: t.identifier() as u32,
                    screen_x: f64::from(t.screen_x()),
                    screen_y: f64::from(t.screen_y()),
                })
                .collect();
            Some(DomEvent::Touch(TouchInput { phase, changed }))
        }
    }
}

fn apply(event: &Event, disposition: Disposition) {
    if disposition.contains(Disposition::PREVENT_DEFAULT) {
        event.prevent_default();
    }
    if disposition.contains(Disposition::STOP_PROPAGATION) {
        event.stop_propagation();
    }
}

// ---------------------------------------------------------------------------
// Mounted page
// ---------------------------------------------------------------------------

struct Shared {
    site: RefCell<Site<WebDom>>,
    window: Window,
    timer: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Shared {
    fn now(&self) -> Duration {
        let ms = self.window.performance().map_or(0.0, |p| p.now());
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or_default()
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    /// Arm a single timeout for the site's next deadline.
    fn schedule(&self, deadline: Option<Duration>) {
        self.cancel_timer();
        let Some(deadline) = deadline else {
            return;
        };
        let delay = deadline.saturating_sub(self.now()).as_millis();
        let delay = i32::try_from(delay).unwrap_or(i32::MAX);
        let tick = self.tick.borrow();
        let Some(tick) = tick.as_ref() else {
            return;
        };
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref::<Function>(),
                delay,
            ) {
            Ok(handle) => self.timer.set(Some(handle)),
            Err(err) => {
                pagekit_core::warn!(error = ?err, "setTimeout failed");
            }
        }
    }

    fn handle(&self, binding_kind: EventKind, listener: pagekit_core::Listener, event: &Event) {
        let Some(dom_event) = translate(binding_kind, event) else {
            return;
        };
        let now = self.now();
        let (disposition, deadline) = {
            let Ok(mut site) = self.site.try_borrow_mut() else {
                pagekit_core::warn!(?listener, "re-entrant dispatch dropped");
                return;
            };
            let d = site.dispatch(listener, &dom_event, now);
            (d, site.next_deadline())
        };
        apply(event, disposition);
        self.schedule(deadline);
    }
}

struct Registration {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

struct Mounted {
    shared: Rc<Shared>,
    registrations: Vec<Registration>,
}

impl Mounted {
    fn new(window: Window, document: Document, cfg: &SiteConfig) -> Result<Self, WebError> {
        let site = Site::mount(WebDom::new(document.clone()), cfg)?;
        let bindings = site.bindings();
        let shared = Rc::new(Shared {
            site: RefCell::new(site),
            window,
            timer: Cell::new(None),
            tick: RefCell::new(None),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        *shared.tick.borrow_mut() = Some(Closure::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.timer.set(None);
            let now = shared.now();
            if let Ok(mut site) = shared.site.try_borrow_mut() {
                site.tick(now);
            };
        }));

        let mut mounted = Self {
            shared,
            registrations: Vec::with_capacity(bindings.len()),
        };
        for binding in bindings {
            if let Err(err) = mounted.register(&document, binding) {
                mounted.unmount();
                return Err(err);
            }
        }
        pagekit_core::debug!(listeners = mounted.registrations.len(), "pagekit mounted");
        Ok(mounted)
    }

    fn register(&mut self, document: &Document, binding: Binding<Element>) -> Result<(), WebError> {
        let target: EventTarget = match binding.target {
            Target::Document => document.clone().into(),
            Target::Element(el) => el.into(),
        };
        let kind = binding.kind.dom_name();
        let weak = Rc::downgrade(&self.shared);
        let (event_kind, listener) = (binding.kind, binding.listener);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle(event_kind, listener, &event);
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(binding.passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref::<Function>(),
                &options,
            )
            .map_err(|err| WebError::Listener {
                kind,
                message: format!("{err:?}"),
            })?;

        self.registrations.push(Registration {
            target,
            kind,
            closure,
        });
        Ok(())
    }

    fn unmount(&mut self) {
        for reg in self.registrations.drain(..) {
            log_js_error(
                reg.target
                    .remove_event_listener_with_callback(reg.kind, reg.closure.as_ref().unchecked_ref()),
                "removeEventListener",
            );
        }
        self.shared.cancel_timer();
        pagekit_core::debug!("pagekit unmounted");
    }
}

// ---------------------------------------------------------------------------
// JS API
// ---------------------------------------------------------------------------

/// Page interactivity handle.
///
/// Listener lifetime is scoped to `mount()`/`unmount()`; dropping the handle
/// from JS (`free()`) unmounts as well.
#[wasm_bindgen]
pub struct PageKit {
    config: SiteConfig,
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl PageKit {
    /// Create a handle from optional JSON options (see `SiteConfig`).
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<PageKit, JsValue> {
        let config = parse_options(options.as_deref()).map_err(to_js)?;
        Ok(Self {
            config,
            mounted: None,
        })
    }

    /// Bind to `window.document` and register every listener. Idempotent.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or(WebError::MissingGlobal("window")).map_err(to_js)?;
        let document = window
            .document()
            .ok_or(WebError::MissingGlobal("document"))
            .map_err(to_js)?;
        self.mounted = Some(Mounted::new(window, document, &self.config).map_err(to_js)?);
        Ok(())
    }

    /// Remove every listener registered by `mount` and cancel pending timers.
    pub fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.unmount();
        }
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    #[wasm_bindgen(js_name = menuOpen)]
    pub fn menu_open(&self) -> bool {
        self.with_site(|site| site.menu_open()).unwrap_or(false)
    }

    /// Index of the image shown in the lightbox, `undefined` when closed.
    #[wasm_bindgen(js_name = lightboxIndex)]
    pub fn lightbox_index(&self) -> Option<u32> {
        self.with_site(|site| site.lightbox().and_then(|lb| lb.current()))
            .flatten()
            .and_then(|i| u32::try_from(i).ok())
    }

    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&self) {
        self.with_site_mut(|site| site.close_menu());
    }

    #[wasm_bindgen(js_name = closeLightbox)]
    pub fn close_lightbox(&self) {
        self.with_site_mut(|site| site.close_lightbox());
    }
}

impl PageKit {
    fn with_site<T>(&self, f: impl FnOnce(&Site<WebDom>) -> T) -> Option<T> {
        let mounted = self.mounted.as_ref()?;
        let site = mounted.shared.site.try_borrow().ok()?;
        Some(f(&site))
    }

    fn with_site_mut(&self, f: impl FnOnce(&mut Site<WebDom>)) {
        if let Some(mounted) = &self.mounted
            && let Ok(mut site) = mounted.shared.site.try_borrow_mut()
        {
            f(&mut site);
        }
    }
}

impl Drop for PageKit {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn to_js(err: WebError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

thread_local! {
    static AUTO: RefCell<Option<PageKit>> = const { RefCell::new(None) };
}

fn auto_mount() -> Result<(), JsValue> {
    let mut kit = PageKit::new(None)?;
    kit.mount()?;
    AUTO.with(|slot| *slot.borrow_mut() = Some(kit));
    Ok(())
}

/// Mount with the default configuration once the document is ready.
#[wasm_bindgen(js_name = start)]
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| to_js(WebError::MissingGlobal("document")))?;
    if crate::document_ready(&document.ready_state()) {
        return auto_mount();
    }

    let on_ready = Closure::once_into_js(move || {
        if let Err(err) = auto_mount() {
            pagekit_core::error!(error = ?err, "pagekit failed to mount");
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        on_ready.unchecked_ref::<Function>(),
        &options,
    )
}
