//! Capture role
//!
//! [`TouchView`] sits on the UI thread. It never calls into the script
//! context; raw samples are normalized here and everything else is handed to
//! the render thread as queued work.

use crate::renderer::{BoxedObserver, Renderer};
use crate::surface::SurfaceSize;
use dynamo_core::QueueProducer;
use dynamo_script::ScriptHost;
use dynamo_services::{PointerTracker, RawSample};

pub struct TouchView<H> {
    tracker: PointerTracker,
    producer: QueueProducer<Renderer<H>>,
    surface: Option<SurfaceSize>,
}

impl<H> Clone for TouchView<H> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker,
            producer: self.producer.clone(),
            surface: self.surface,
        }
    }
}

impl<H: ScriptHost + 'static> TouchView<H> {
    pub fn new(producer: QueueProducer<Renderer<H>>) -> Self {
        Self {
            tracker: PointerTracker::new(),
            producer,
            surface: None,
        }
    }

    pub fn surface(&self) -> Option<SurfaceSize> {
        self.surface
    }

    /// Normalizes one raw sample and queues the resulting batch. Always
    /// reports the sample as consumed.
    pub fn on_touch_event(&self, sample: &RawSample) -> bool {
        let height = self.surface.map(|s| s.flip_height()).unwrap_or(0.0);

        match self.tracker.track(sample, height) {
            Ok(batch) => {
                if self.producer.enqueue_batch(batch).is_err() {
                    tracing::debug!("render thread gone, dropping touch sample");
                }
            }
            Err(err) => {
                tracing::warn!(action = sample.action, error = %err, "malformed touch sample");
            }
        }
        true
    }

    pub fn surface_created(&mut self, size: SurfaceSize) {
        self.surface = Some(size);
        self.queue(move |renderer| renderer.on_surface_created(size));
    }

    pub fn surface_changed(&mut self, size: SurfaceSize) {
        self.surface = Some(size);
        self.queue(move |renderer| renderer.on_surface_changed(size));
    }

    pub fn surface_destroyed(&mut self) {
        self.surface = None;
        self.queue(|renderer| renderer.on_surface_destroyed());
    }

    /// Installs (or with `None`, removes) the message observer. It takes
    /// effect in queue order, on the render thread.
    pub fn set_observer(&self, observer: Option<BoxedObserver>) {
        self.queue(move |renderer| renderer.set_observer(observer));
    }

    fn queue<F>(&self, f: F)
    where
        F: FnOnce(&mut Renderer<H>) + Send + 'static,
    {
        if self.producer.queue_task(f).is_err() {
            tracing::debug!("render thread gone, dropping queued task");
        }
    }
}
