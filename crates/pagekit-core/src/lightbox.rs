#![forbid(unsafe_code)]

//! Gallery lightbox.
//!
//! State machine: closed → open(index) → closed. Navigation wraps modulo
//! the gallery length and never changes the open/closed state.
//!
//! Swipe pairing: a leftward swipe shows the next image, a rightward swipe
//! the previous one.

use crate::config::{ConfigError, LightboxConfig, compile};
use crate::dom::{Dom, aria, aria_bool, class};
use crate::input::{Disposition, KeyCode, KeyInput, TouchInput};
use crate::swipe::{Swipe, SwipeTracker};

/// One gallery entry, read once at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage<N> {
    pub thumbnail: N,
    pub src: String,
    pub full: Option<String>,
    pub alt: String,
}

impl<N> GalleryImage<N> {
    /// Reference shown in the lightbox: the full-size one if present.
    #[must_use]
    pub fn display_src(&self) -> &str {
        self.full.as_deref().unwrap_or(&self.src)
    }
}

/// Optional lightbox chrome, each skipped when absent.
#[derive(Debug, Clone, Default)]
pub struct LightboxParts<N> {
    pub close: Option<N>,
    pub content: Option<N>,
    pub backdrop: Option<N>,
    pub prev: Option<N>,
    pub next: Option<N>,
}

/// Lightbox controller.
#[derive(Debug)]
pub struct Lightbox<N> {
    container: N,
    image: N,
    parts: LightboxParts<N>,
    gallery: Vec<GalleryImage<N>>,
    current: Option<usize>,
    swipe: SwipeTracker,
}

impl<N: Clone + PartialEq + core::fmt::Debug> Lightbox<N> {
    /// Locate the lightbox and collect the gallery. `Ok(None)` when the
    /// container or image slot is missing.
    pub fn mount<D: Dom<Node = N>>(
        dom: &D,
        cfg: &LightboxConfig,
    ) -> Result<Option<Self>, ConfigError> {
        let container = dom.query(None, &compile("lightbox.container", &cfg.container)?);
        let image = dom.query(None, &compile("lightbox.image", &cfg.image)?);
        let (Some(container), Some(image)) = (container, image) else {
            crate::debug!("lightbox not initialized: container or image slot missing");
            return Ok(None);
        };

        let parts = LightboxParts {
            close: dom.query(None, &compile("lightbox.close", &cfg.close)?),
            content: dom.query(None, &compile("lightbox.content", &cfg.content)?),
            backdrop: dom.query(None, &compile("lightbox.backdrop", &cfg.backdrop)?),
            prev: dom.query(None, &compile("lightbox.prev", &cfg.prev)?),
            next: dom.query(None, &compile("lightbox.next", &cfg.next)?),
        };

        let gallery = dom
            .query_all(
                None,
                &compile("lightbox.gallery_images", &cfg.gallery_images)?,
            )
            .into_iter()
            .map(|thumbnail| {
                dom.set_style(&thumbnail, "cursor", "zoom-in");
                GalleryImage {
                    src: dom.image_source(&thumbnail),
                    full: dom
                        .attribute(&thumbnail, &cfg.full_attribute)
                        .filter(|f| !f.is_empty()),
                    alt: dom.attribute(&thumbnail, "alt").unwrap_or_default(),
                    thumbnail,
                }
            })
            .collect::<Vec<_>>();

        crate::debug!(images = gallery.len(), "lightbox initialized");
        Ok(Some(Self {
            container,
            image,
            parts,
            gallery,
            current: None,
            swipe: SwipeTracker::new(cfg.swipe_threshold_px),
        }))
    }

    #[must_use]
    pub fn gallery(&self) -> &[GalleryImage<N>] {
        &self.gallery
    }

    #[must_use]
    pub fn parts(&self) -> &LightboxParts<N> {
        &self.parts
    }

    /// Index of the displayed image; `None` while closed.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Open at gallery index `index`. Out of range is ignored.
    pub fn open_at<D: Dom<Node = N>>(&mut self, dom: &D, index: usize) {
        let Some(entry) = self.gallery.get(index) else {
            return;
        };
        dom.set_image(&self.image, entry.display_src(), &entry.alt);
        self.current = Some(index);

        dom.set_attribute(&self.container, aria::HIDDEN, aria_bool(false));
        for part in [&self.parts.backdrop, &self.parts.content].into_iter().flatten() {
            dom.add_class(part, class::VISIBLE);
        }
        crate::trace!(index, "lightbox opened");
    }

    pub fn close<D: Dom<Node = N>>(&mut self, dom: &D) {
        dom.set_attribute(&self.container, aria::HIDDEN, aria_bool(true));
        for part in [&self.parts.backdrop, &self.parts.content].into_iter().flatten() {
            dom.remove_class(part, class::VISIBLE);
        }
        dom.set_image(&self.image, "", "");
        self.current = None;
        crate::trace!("lightbox closed");
    }

    pub fn show_prev<D: Dom<Node = N>>(&mut self, dom: &D) {
        let len = self.gallery.len();
        self.step(dom, |i| (i + len - 1) % len);
    }

    pub fn show_next<D: Dom<Node = N>>(&mut self, dom: &D) {
        let len = self.gallery.len();
        self.step(dom, |i| (i + 1) % len);
    }

    fn step<D: Dom<Node = N>>(&mut self, dom: &D, next: impl FnOnce(usize) -> usize) {
        if self.gallery.is_empty() {
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        let index = next(current);
        let entry = &self.gallery[index];
        dom.set_image(&self.image, entry.display_src(), &entry.alt);
        self.current = Some(index);
        crate::trace!(index, "lightbox moved");
    }

    /// Thumbnail click: open on that image instead of following a link.
    pub fn on_thumbnail_click<D: Dom<Node = N>>(&mut self, dom: &D, index: usize) -> Disposition {
        self.open_at(dom, index);
        Disposition::PREVENT_DEFAULT
    }

    /// Prev button click. Must not bubble to the backdrop.
    pub fn on_prev_click<D: Dom<Node = N>>(&mut self, dom: &D) -> Disposition {
        self.show_prev(dom);
        Disposition::STOP_PROPAGATION
    }

    /// Next button click. Must not bubble to the backdrop.
    pub fn on_next_click<D: Dom<Node = N>>(&mut self, dom: &D) -> Disposition {
        self.show_next(dom);
        Disposition::STOP_PROPAGATION
    }

    /// Close button or backdrop click.
    pub fn on_dismiss_click<D: Dom<Node = N>>(&mut self, dom: &D) -> Disposition {
        if self.is_open() {
            self.close(dom);
        }
        Disposition::empty()
    }

    /// Document-level key handling: arrows navigate, Escape closes.
    pub fn on_key<D: Dom<Node = N>>(&mut self, dom: &D, key: &KeyInput) -> Disposition {
        if !self.is_open() {
            return Disposition::empty();
        }
        match key.code {
            KeyCode::Left => {
                self.show_prev(dom);
                Disposition::PREVENT_DEFAULT
            }
            KeyCode::Right => {
                self.show_next(dom);
                Disposition::PREVENT_DEFAULT
            }
            KeyCode::Escape => {
                self.close(dom);
                Disposition::empty()
            }
            _ => Disposition::empty(),
        }
    }

    /// Touch on the content wrapper.
    pub fn on_touch<D: Dom<Node = N>>(&mut self, dom: &D, touch: &TouchInput) -> Disposition {
        match self.swipe.feed(touch) {
            Some(Swipe::Left) => self.show_next(dom),
            Some(Swipe::Right) => self.show_prev(dom),
            None => {}
        }
        Disposition::empty()
    }
}
