//! The vehicle page: loader, gallery, lightbox and carousel wired together.

use std::collections::HashSet;

use tradelux_viewer::{
    Carousel, EventStatus, Gallery, LayoutMode, Lightbox, ListenerRegistry, SwipeTracker,
    ViewerConfig,
};

use crate::handlers::{handle_gallery, handle_modal, handle_pointer, handle_touch, handle_window};
use crate::loader::{VehicleLoader, VehicleSource};
use crate::message::{DataMessage, Message};
use crate::view::{render_page, PageView};

/// State of one vehicle page.
pub struct VehicleViewer<S> {
    loader: VehicleLoader<S>,
    config: ViewerConfig,
    gallery: Gallery,
    lightbox: Lightbox,
    carousel: Carousel,
    swipe: SwipeTracker,
    layout: LayoutMode,
    failed_images: HashSet<String>,
}

impl<S: VehicleSource> VehicleViewer<S> {
    pub fn new(source: S, vehicle_id: impl Into<String>, config: ViewerConfig) -> Self {
        Self::with_registry(source, vehicle_id, config, ListenerRegistry::new())
    }

    /// Use a shared listener registry, e.g. the page's.
    pub fn with_registry(
        source: S,
        vehicle_id: impl Into<String>,
        config: ViewerConfig,
        registry: ListenerRegistry,
    ) -> Self {
        let lightbox = Lightbox::new(config.viewport(), registry);
        let swipe = SwipeTracker::new(config.swipe_threshold);
        Self {
            loader: VehicleLoader::new(source, vehicle_id),
            config,
            gallery: Gallery::default(),
            lightbox,
            carousel: Carousel::default(),
            swipe,
            layout: LayoutMode::default(),
            failed_images: HashSet::new(),
        }
    }

    /// Update state based on a message.
    ///
    /// Returns whether the event was consumed, so the shell can suppress the
    /// browser default (page scroll on wheel, for instance).
    pub fn update(&mut self, message: Message) -> EventStatus {
        match message {
            Message::Gallery(msg) => handle_gallery(
                msg,
                &self.gallery,
                &mut self.lightbox,
                &mut self.carousel,
                &mut self.failed_images,
            ),
            Message::Modal(msg) => handle_modal(
                msg,
                &self.gallery,
                &mut self.lightbox,
                &self.config.keybindings,
            ),
            Message::Pointer(event) => handle_pointer(event, &mut self.lightbox),
            Message::Touch(surface, event) => handle_touch(
                surface,
                event,
                &mut self.swipe,
                &self.gallery,
                &mut self.lightbox,
                &mut self.carousel,
            ),
            Message::Window(msg) => {
                handle_window(msg, &mut self.layout, self.config.mobile_breakpoint);
                EventStatus::Captured
            }
            Message::Data(DataMessage::Loaded(result)) => {
                self.loader.resolve(result);
                self.sync_gallery();
                EventStatus::Captured
            }
        }
    }

    /// Fetch (or refetch) the vehicle and rebuild the gallery.
    pub async fn refresh(&mut self) {
        self.loader.fetch().await;
        self.sync_gallery();
    }

    /// Rebuild the gallery from the current payload, keeping the open image
    /// if it survived.
    fn sync_gallery(&mut self) {
        let categories = self
            .loader
            .payload()
            .map(|payload| payload.images.to_categories())
            .unwrap_or_default();
        let selected_url = self
            .lightbox
            .current(self.gallery.sequence())
            .map(|image| image.url.clone());

        if self.gallery.set_categories(categories) {
            self.lightbox
                .reconcile(selected_url.as_deref(), self.gallery.sequence());
            self.carousel.clamp_to(self.gallery.len());
            let gallery = &self.gallery;
            self.failed_images
                .retain(|url| gallery.category_of(url).is_some());
        }
    }

    pub fn loader(&self) -> &VehicleLoader<S> {
        &self.loader
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn is_image_failed(&self, url: &str) -> bool {
        self.failed_images.contains(url)
    }

    /// Headless page model for the current state.
    pub fn view(&self) -> PageView {
        render_page(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::{payload, ScriptedSource};
    use crate::loader::LoadError;
    use crate::message::{GalleryMessage, ModalMessage, TouchSurface, WindowMessage};
    use tradelux_viewer::{Key, Point, PointerEvent, TouchEvent};

    const IMAGES: [(&str, &str); 5] = [
        ("Front", "/f1.jpg"),
        ("Front", "/f2.jpg"),
        ("Rear", "/r1.jpg"),
        ("Interior", "/i1.jpg"),
        ("Interior", "/i2.jpg"),
    ];

    async fn loaded_viewer() -> (VehicleViewer<ScriptedSource>, ListenerRegistry) {
        let registry = ListenerRegistry::new();
        let source = ScriptedSource::new(vec![Ok(payload("Porsche", &IMAGES))]);
        let mut viewer =
            VehicleViewer::with_registry(source, "VIN1", ViewerConfig::default(), registry.clone());
        viewer.refresh().await;
        (viewer, registry)
    }

    fn click(url: &str) -> Message {
        Message::Gallery(GalleryMessage::ThumbnailClicked(url.into()))
    }

    fn key(key: Key) -> Message {
        Message::Modal(ModalMessage::Key(key))
    }

    fn swipe(viewer: &mut VehicleViewer<ScriptedSource>, surface: TouchSurface, dx: f32, dy: f32) {
        let start = Point::new(300.0, 300.0);
        viewer.update(Message::Touch(surface, TouchEvent::Start(start)));
        viewer.update(Message::Touch(
            surface,
            TouchEvent::Move(Point::new(start.x - dx, start.y - dy)),
        ));
        viewer.update(Message::Touch(surface, TouchEvent::End));
    }

    #[tokio::test]
    async fn thumbnail_click_opens_flat_index() {
        let (mut viewer, registry) = loaded_viewer().await;
        assert_eq!(viewer.gallery().len(), 5);

        assert!(viewer.update(click("/r1.jpg")).is_captured());
        assert_eq!(viewer.lightbox().selection(), Some(2));
        assert!(registry.scroll_locked());
    }

    #[tokio::test]
    async fn stale_click_keeps_modal_closed() {
        let (mut viewer, registry) = loaded_viewer().await;
        assert!(!viewer.update(click("/gone.jpg")).is_captured());
        assert!(!viewer.lightbox().is_open());
        assert!(!registry.scroll_locked());
    }

    #[tokio::test]
    async fn keyboard_navigation_and_escape() {
        let (mut viewer, registry) = loaded_viewer().await;

        // Keys do nothing while closed
        viewer.update(key(Key::ArrowRight));
        assert!(!viewer.lightbox().is_open());

        viewer.update(click("/f1.jpg"));
        viewer.update(key(Key::ArrowLeft));
        assert_eq!(viewer.lightbox().selection(), Some(0));
        viewer.update(key(Key::ArrowRight));
        viewer.update(key(Key::ArrowRight));
        assert_eq!(viewer.lightbox().selection(), Some(2));

        viewer.update(key(Key::Escape));
        assert!(!viewer.lightbox().is_open());
        assert_eq!(registry.active_key_listeners(), 0);
    }

    #[tokio::test]
    async fn navigation_resets_zoom_and_pan() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(click("/f2.jpg"));
        viewer.update(Message::Modal(ModalMessage::ZoomIn));
        viewer.update(Message::Modal(ModalMessage::ZoomIn));
        viewer.update(Message::Pointer(PointerEvent::Down(Point::new(0.0, 0.0))));
        viewer.update(Message::Pointer(PointerEvent::Move(Point::new(80.0, 60.0))));
        assert_eq!(viewer.lightbox().viewport().zoom(), 2.0);
        assert!(viewer.lightbox().viewport().is_dragging());

        viewer.update(Message::Modal(ModalMessage::Next));
        let viewport = viewer.lightbox().viewport();
        assert_eq!(viewer.lightbox().selection(), Some(2));
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.pan(), Point::ZERO);
        assert!(!viewport.is_dragging());
    }

    #[tokio::test]
    async fn wheel_is_captured_only_while_open() {
        let (mut viewer, _registry) = loaded_viewer().await;
        let wheel = Message::Pointer(PointerEvent::Wheel { delta_y: -100.0 });
        assert!(!viewer.update(wheel.clone()).is_captured());

        viewer.update(click("/f1.jpg"));
        assert!(viewer.update(wheel).is_captured());
        assert_eq!(viewer.lightbox().viewport().zoom(), 1.5);
        assert!(viewer
            .update(Message::Pointer(PointerEvent::Wheel { delta_y: 0.0 }))
            .is_captured());
        assert_eq!(viewer.lightbox().viewport().zoom(), 1.5);
    }

    #[tokio::test]
    async fn modal_swipes() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(click("/r1.jpg"));

        swipe(&mut viewer, TouchSurface::Modal, 60.0, 10.0);
        assert_eq!(viewer.lightbox().selection(), Some(3));

        swipe(&mut viewer, TouchSurface::Modal, 10.0, 60.0);
        assert_eq!(viewer.lightbox().selection(), Some(3));

        swipe(&mut viewer, TouchSurface::Modal, -60.0, 10.0);
        assert_eq!(viewer.lightbox().selection(), Some(2));
    }

    #[tokio::test]
    async fn modal_swipe_right_on_first_is_noop() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(click("/f1.jpg"));
        swipe(&mut viewer, TouchSurface::Modal, -60.0, 10.0);
        assert_eq!(viewer.lightbox().selection(), Some(0));
    }

    #[tokio::test]
    async fn carousel_swipes_and_tap() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(Message::Window(WindowMessage::Resized { width: 390.0 }));
        assert_eq!(viewer.layout(), LayoutMode::Carousel);

        swipe(&mut viewer, TouchSurface::Carousel, 60.0, 10.0);
        swipe(&mut viewer, TouchSurface::Carousel, 60.0, 10.0);
        assert_eq!(viewer.carousel().index(), 2);
        assert!(!viewer.lightbox().is_open());

        viewer.update(Message::Touch(
            TouchSurface::Carousel,
            TouchEvent::Start(Point::new(10.0, 10.0)),
        ));
        viewer.update(Message::Touch(TouchSurface::Carousel, TouchEvent::End));
        assert_eq!(viewer.lightbox().selection(), Some(2));

        viewer.update(Message::Gallery(GalleryMessage::CarouselDot(4)));
        assert_eq!(viewer.carousel().index(), 4);
        viewer.update(Message::Gallery(GalleryMessage::CarouselDot(9)));
        assert_eq!(viewer.carousel().index(), 4);
    }

    #[tokio::test]
    async fn reload_remaps_selection_by_url() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(click("/i1.jpg"));
        assert_eq!(viewer.lightbox().selection(), Some(3));

        // Front photos removed: /i1.jpg moves to index 1
        let reloaded = payload("Porsche", &[("Rear", "/r1.jpg"), ("Interior", "/i1.jpg")]);
        viewer.update(Message::Data(DataMessage::Loaded(Ok(reloaded))));
        assert_eq!(viewer.gallery().generation(), 2);
        assert_eq!(viewer.lightbox().selection(), Some(1));
    }

    #[tokio::test]
    async fn reload_without_selected_image_closes_modal() {
        let (mut viewer, registry) = loaded_viewer().await;
        viewer.update(click("/i2.jpg"));

        let reloaded = payload("Porsche", &[("Front", "/f1.jpg")]);
        viewer.update(Message::Data(DataMessage::Loaded(Ok(reloaded))));
        assert!(!viewer.lightbox().is_open());
        assert!(!registry.scroll_locked());
    }

    #[tokio::test]
    async fn identical_reload_does_not_rebuild() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(Message::Data(DataMessage::Loaded(Ok(payload("Porsche", &IMAGES)))));
        assert_eq!(viewer.gallery().generation(), 1);
    }

    #[tokio::test]
    async fn failed_refetch_keeps_gallery() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(click("/r1.jpg"));
        viewer.update(Message::Data(DataMessage::Loaded(Err(LoadError::BackendUnavailable(
            "down".into(),
        )))));
        assert_eq!(viewer.gallery().len(), 5);
        assert_eq!(viewer.lightbox().selection(), Some(2));
    }

    #[tokio::test]
    async fn empty_gallery_cannot_open() {
        let source = ScriptedSource::new(vec![Ok(payload("Porsche", &[]))]);
        let mut viewer = VehicleViewer::new(source, "VIN1", ViewerConfig::default());
        viewer.refresh().await;

        assert!(viewer.gallery().is_empty());
        viewer.update(Message::Window(WindowMessage::Resized { width: 390.0 }));
        viewer.update(Message::Touch(
            TouchSurface::Carousel,
            TouchEvent::Start(Point::new(10.0, 10.0)),
        ));
        viewer.update(Message::Touch(TouchSurface::Carousel, TouchEvent::End));
        assert!(!viewer.lightbox().is_open());
    }

    #[tokio::test]
    async fn image_failure_is_per_url() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer.update(Message::Gallery(GalleryMessage::ImageFailed("/f2.jpg".into())));
        assert!(viewer.is_image_failed("/f2.jpg"));
        assert!(!viewer.is_image_failed("/f1.jpg"));

        // Navigation is unaffected
        viewer.update(click("/f1.jpg"));
        viewer.update(Message::Modal(ModalMessage::Next));
        assert_eq!(viewer.lightbox().selection(), Some(1));
    }

    #[tokio::test]
    async fn teardown_releases_listeners() {
        let (mut viewer, registry) = loaded_viewer().await;
        viewer.update(click("/f1.jpg"));
        assert_eq!(registry.active_key_listeners(), 1);
        drop(viewer);
        assert_eq!(registry.active_key_listeners(), 0);
        assert!(!registry.scroll_locked());
    }

    #[tokio::test]
    async fn refresh_pushes_new_payload() {
        let (mut viewer, _registry) = loaded_viewer().await;
        viewer
            .loader()
            .source()
            .push(Ok(payload("Porsche", &[("Front", "/new.jpg")])));
        viewer.refresh().await;
        assert_eq!(viewer.gallery().len(), 1);
        assert_eq!(viewer.loader().source().calls(), 2);
    }
}
