//! Dedicated render thread
//!
//! The script host is created inside the thread and never leaves it. The
//! thread paces itself with a [`FrameClock`] and stops when a stop task
//! comes through the queue, after everything queued before it has run.

use crate::renderer::Renderer;
use crate::view::TouchView;
use dynamo_core::time::FrameClock;
use dynamo_core::{EventQueue, QueueProducer};
use dynamo_script::{BootConfig, ScriptHost};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Instant;

pub const THREAD_NAME: &str = "dynamo-render";

pub struct RenderThread<H: ScriptHost + 'static> {
    producer: QueueProducer<Renderer<H>>,
    handle: Option<JoinHandle<u64>>,
}

impl<H: ScriptHost + 'static> RenderThread<H> {
    pub fn spawn(boot: BootConfig, target_fps: u32) -> io::Result<Self> {
        let queue = EventQueue::<Renderer<H>>::new();
        let producer = queue.producer();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run::<H>(boot, target_fps, queue))?;

        Ok(Self {
            producer,
            handle: Some(handle),
        })
    }

    /// A capture-side view feeding this thread.
    pub fn view(&self) -> TouchView<H> {
        TouchView::new(self.producer.clone())
    }

    pub fn producer(&self) -> QueueProducer<Renderer<H>> {
        self.producer.clone()
    }

    /// Stops the loop once queued work has run and waits for it. Returns
    /// the number of frames drawn.
    pub fn shutdown(mut self) -> u64 {
        self.stop()
    }

    fn stop(&mut self) -> u64 {
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        // A closed queue means the thread already exited.
        let _ = self.producer.queue_task(|renderer| renderer.request_stop());

        match handle.join() {
            Ok(frames) => frames,
            Err(_) => {
                tracing::error!("render thread panicked");
                0
            }
        }
    }
}

impl<H: ScriptHost + 'static> Drop for RenderThread<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<H: ScriptHost>(boot: BootConfig, target_fps: u32, queue: EventQueue<Renderer<H>>) -> u64 {
    let mut renderer = Renderer::<H>::new(boot);
    let mut clock = FrameClock::with_fps(target_fps);
    tracing::info!(fps = target_fps, "render thread started");

    while !renderer.stop_requested() {
        renderer.draw_frame(&queue);
        clock.advance(Instant::now());
        thread::sleep(clock.until_next(Instant::now()));
    }

    tracing::info!(frames = renderer.frame_count(), "render thread stopped");
    renderer.frame_count()
}
