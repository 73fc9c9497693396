//! Dynamo Render
//!
//! Hosts the two roles around the script context:
//! - Capture role ([`TouchView`]): UI thread, normalizes touches, queues work
//! - Render role ([`Renderer`]): render thread, owns the script context and
//!   runs one frame cycle per tick
//!
//! [`RenderThread`] runs the render role on its own thread and
//! [`window::DesktopApp`] drives the capture role from a winit window.

pub mod render_thread;
pub mod renderer;
pub mod surface;
pub mod view;
pub mod window;

pub use render_thread::RenderThread;
pub use renderer::{BoxedObserver, FrameReport, Renderer};
pub use surface::SurfaceSize;
pub use view::TouchView;
pub use window::{ContactAggregator, DesktopApp, WindowConfig};

pub use winit;
