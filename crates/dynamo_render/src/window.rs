//! Window management
//!
//! Desktop host for the capture role via winit. Window lifecycle maps onto
//! surface lifecycle, and touch (or left mouse button) input is regrouped into
//! raw multi-contact samples before it reaches the [`TouchView`].

use crate::surface::SurfaceSize;
use crate::view::TouchView;
use dynamo_script::ScriptHost;
use dynamo_services::{RawAction, RawContact, RawSample};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dynamo".to_string(),
            width: 480,
            height: 800,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// Platform contact id used for the mouse.
pub const MOUSE_CONTACT: u64 = u64::MAX;

/// Tracks active contacts and emits raw samples the way a touch screen
/// reports them: every sample lists all active contacts in press order, and
/// each contact keeps the smallest pointer id free when it went down.
#[derive(Debug, Default)]
pub struct ContactAggregator {
    active: Vec<(u64, RawContact)>,
}

impl ContactAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.active.len()
    }

    pub fn press(&mut self, contact: u64, x: f32, y: f32) -> Option<RawSample> {
        if self.position(contact).is_some() {
            return self.moved(contact, x, y);
        }
        let id = self.free_id();
        self.active.push((contact, RawContact::new(id, x, y)));

        let action = match self.active.len() {
            1 => RawAction::Down,
            n => RawAction::PointerDown { index: n - 1 },
        };
        Some(self.sample(action))
    }

    pub fn moved(&mut self, contact: u64, x: f32, y: f32) -> Option<RawSample> {
        let index = self.position(contact)?;
        self.update(index, x, y);
        Some(self.sample(RawAction::Move))
    }

    /// The lifted contact is still part of the sample it ends.
    pub fn release(&mut self, contact: u64, x: f32, y: f32) -> Option<RawSample> {
        let index = self.position(contact)?;
        self.update(index, x, y);

        let action = match self.active.len() {
            1 => RawAction::Up,
            _ => RawAction::PointerUp { index },
        };
        let sample = self.sample(action);
        self.active.remove(index);
        Some(sample)
    }

    /// Aborts the whole gesture.
    pub fn cancel(&mut self) -> Option<RawSample> {
        if self.active.is_empty() {
            return None;
        }
        let sample = self.sample(RawAction::Cancel);
        self.active.clear();
        Some(sample)
    }

    fn position(&self, contact: u64) -> Option<usize> {
        self.active.iter().position(|(platform, _)| *platform == contact)
    }

    fn update(&mut self, index: usize, x: f32, y: f32) {
        let raw = &mut self.active[index].1;
        raw.x = x;
        raw.y = y;
    }

    fn free_id(&self) -> u32 {
        (0..)
            .find(|id| self.active.iter().all(|(_, raw)| raw.id.0 != *id))
            .unwrap_or_default()
    }

    fn sample(&self, action: RawAction) -> RawSample {
        RawSample::new(action, self.active.iter().map(|(_, raw)| *raw).collect())
    }
}

/// Desktop application handler driving one window.
pub struct DesktopApp<H: ScriptHost + 'static> {
    config: WindowConfig,
    window: Option<Window>,
    view: TouchView<H>,
    contacts: ContactAggregator,
    cursor: PhysicalPosition<f64>,
}

impl<H: ScriptHost + 'static> DesktopApp<H> {
    pub fn new(config: WindowConfig, view: TouchView<H>) -> Self {
        Self {
            config,
            window: None,
            view,
            contacts: ContactAggregator::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
        }
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    fn forward(&self, sample: Option<RawSample>) {
        if let Some(sample) = sample {
            self.view.on_touch_event(&sample);
        }
    }

    fn on_touch(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) {
        let (x, y) = (location.x as f32, location.y as f32);
        let sample = match phase {
            TouchPhase::Started => self.contacts.press(id, x, y),
            TouchPhase::Moved => self.contacts.moved(id, x, y),
            TouchPhase::Ended => self.contacts.release(id, x, y),
            TouchPhase::Cancelled => self.contacts.cancel(),
        };
        self.forward(sample);
    }

    fn close(&mut self) {
        let sample = self.contacts.cancel();
        self.forward(sample);
        if self.window.take().is_some() {
            self.view.surface_destroyed();
        }
    }
}

impl<H: ScriptHost + 'static> ApplicationHandler for DesktopApp<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(window_attributes(&self.config)) {
            Ok(window) => {
                let size = SurfaceSize::from(window.inner_size());
                tracing::info!(width = size.width, height = size.height, "window created");
                self.view.surface_created(size);
                self.window = Some(window);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create window");
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.close();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                self.close();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.view.surface_changed(size.into()),
            WindowEvent::Touch(touch) => self.on_touch(touch.id, touch.phase, touch.location),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                let (x, y) = (position.x as f32, position.y as f32);
                let sample = self.contacts.moved(MOUSE_CONTACT, x, y);
                self.forward(sample);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = (self.cursor.x as f32, self.cursor.y as f32);
                let sample = match state {
                    ElementState::Pressed => self.contacts.press(MOUSE_CONTACT, x, y),
                    ElementState::Released => self.contacts.release(MOUSE_CONTACT, x, y),
                };
                self.forward(sample);
            }
            _ => {}
        }
    }
}
