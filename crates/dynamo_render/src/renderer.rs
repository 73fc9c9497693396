//! Render role
//!
//! [`Renderer`] lives on the render thread and owns the script context for
//! the lifetime of one surface. Everything the capture side wants from it
//! arrives through the [`EventQueue`], so surface lifecycle and touches stay
//! in the order they happened.

use crate::surface::SurfaceSize;
use dynamo_core::{EventQueue, PointerEvent, PointerSink};
use dynamo_script::{BootConfig, DrainReport, MessageObserver, ResultDrainer, ScriptHost};

/// Observer handed over from the capture side.
pub type BoxedObserver = Box<dyn MessageObserver + Send>;

enum HostState<H> {
    /// No surface, or the surface was torn down.
    Idle,
    Running(H),
    /// Boot failed for the current surface. Stays failed until the surface
    /// is destroyed and created again.
    Failed,
}

/// What one call to [`Renderer::draw_frame`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub tasks_run: usize,
    pub cycled: bool,
    pub messages: DrainReport,
}

pub struct Renderer<H> {
    boot: BootConfig,
    host: HostState<H>,
    surface: Option<SurfaceSize>,
    observer: Option<BoxedObserver>,
    frame: u64,
    stop_requested: bool,
}

impl<H: ScriptHost> Renderer<H> {
    pub fn new(boot: BootConfig) -> Self {
        Self {
            boot,
            host: HostState::Idle,
            surface: None,
            observer: None,
            frame: 0,
            stop_requested: false,
        }
    }

    pub fn set_observer(&mut self, observer: Option<BoxedObserver>) {
        self.observer = observer;
    }

    /// The surface can now take rendering calls, so the script context may
    /// boot. A surface re-created on top of a live context keeps it.
    pub fn on_surface_created(&mut self, size: SurfaceSize) {
        self.surface = Some(size);
        tracing::debug!(width = size.width, height = size.height, "surface created");

        if matches!(self.host, HostState::Idle) {
            self.host = match H::launch(&self.boot) {
                Ok(host) => HostState::Running(host),
                Err(err) => {
                    tracing::error!(
                        boot = %self.boot.boot_script.display(),
                        error = %err,
                        "failed to initialize script context"
                    );
                    HostState::Failed
                }
            };
        }
    }

    /// Viewport only; the script context is not involved.
    pub fn on_surface_changed(&mut self, size: SurfaceSize) {
        self.surface = Some(size);
        tracing::debug!(width = size.width, height = size.height, "surface changed");
    }

    /// Tears the script context down with the surface.
    pub fn on_surface_destroyed(&mut self) {
        self.surface = None;
        if !matches!(self.host, HostState::Idle) {
            tracing::info!(frame = self.frame, "surface destroyed, releasing script context");
        }
        self.host = HostState::Idle;
    }

    pub fn request_stop(&mut self) {
        self.on_surface_destroyed();
        self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub fn viewport(&self) -> Option<SurfaceSize> {
        self.surface
    }

    pub fn is_running(&self) -> bool {
        matches!(self.host, HostState::Running(_))
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.host, HostState::Failed)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn host(&self) -> Option<&H> {
        match &self.host {
            HostState::Running(host) => Some(host),
            _ => None,
        }
    }

    /// One render tick: queued work first, then the script's frame cycle,
    /// then its messages.
    pub fn draw_frame(&mut self, queue: &EventQueue<Self>) -> FrameReport {
        let mut report = FrameReport {
            tasks_run: queue.drain_and_run_all(self),
            ..FrameReport::default()
        };

        if let HostState::Running(host) = &mut self.host {
            report.cycled = true;
            match host.run_frame_cycle() {
                Ok(result) => {
                    if let Some(observer) = self.observer.as_mut() {
                        report.messages = ResultDrainer::drain(result, observer.as_mut());
                    }
                }
                Err(err) => {
                    tracing::warn!(frame = self.frame, error = %err, "frame cycle failed");
                }
            }
        }

        self.frame += 1;
        report
    }
}

impl<H: ScriptHost> PointerSink for Renderer<H> {
    fn on_pointer_event(&mut self, event: PointerEvent) {
        match &mut self.host {
            HostState::Running(host) => {
                if let Err(err) = host.inject_touch(&event) {
                    tracing::warn!(
                        finger = %event.id,
                        phase = %event.phase,
                        error = %err,
                        "touch injection failed"
                    );
                }
            }
            _ => {
                tracing::debug!(
                    finger = %event.id,
                    phase = %event.phase,
                    "no script context, dropping touch event"
                );
            }
        }
    }
}
