//! Render thread behavior with an instrumented script host.

use dynamo_core::{FrameResult, MessageValue, PointerEvent, ResultValue};
use dynamo_render::{RenderThread, SurfaceSize};
use dynamo_script::ffi::TouchArgs;
use dynamo_script::{BootConfig, CallError, InitError, ScriptHost};
use dynamo_services::{RawAction, RawContact, RawSample};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

#[derive(Default)]
struct Recorder {
    in_call: AtomicBool,
    overlaps: AtomicUsize,
    launches: AtomicUsize,
    teardowns: AtomicUsize,
    cycles: AtomicUsize,
    threads: Mutex<HashSet<ThreadId>>,
    touches: Mutex<Vec<(u32, bool, &'static str)>>,
}

impl Recorder {
    fn enter(&self) {
        if self.in_call.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.threads.lock().unwrap().insert(thread::current().id());
        thread::yield_now();
    }

    fn exit(&self) {
        self.in_call.store(false, Ordering::SeqCst);
    }

    fn touches(&self) -> Vec<(u32, bool, &'static str)> {
        self.touches.lock().unwrap().clone()
    }
}

/// Recorders keyed by boot script so tests can run side by side.
fn recorder(boot: &Path) -> Arc<Recorder> {
    static RECORDERS: OnceLock<Mutex<HashMap<PathBuf, Arc<Recorder>>>> = OnceLock::new();
    let mut map = RECORDERS.get_or_init(Default::default).lock().unwrap();
    Arc::clone(map.entry(boot.to_path_buf()).or_default())
}

struct InstrumentedHost {
    rec: Arc<Recorder>,
}

impl ScriptHost for InstrumentedHost {
    fn launch(boot: &BootConfig) -> Result<Self, InitError> {
        let rec = recorder(&boot.boot_script);
        rec.enter();
        rec.launches.fetch_add(1, Ordering::SeqCst);
        rec.exit();
        Ok(Self { rec })
    }

    fn inject_touch(&mut self, event: &PointerEvent) -> Result<(), CallError> {
        self.rec.enter();
        let args = TouchArgs::from(event);
        self.rec
            .touches
            .lock()
            .unwrap()
            .push((args.finger, args.is_down, args.phase));
        self.rec.exit();
        Ok(())
    }

    fn run_frame_cycle(&mut self) -> Result<Option<FrameResult>, CallError> {
        self.rec.enter();
        let frame = self.rec.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.rec.exit();
        Ok(Some(FrameResult::from([(
            "frame".to_string(),
            ResultValue::Number(frame as f64),
        )])))
    }
}

impl Drop for InstrumentedHost {
    fn drop(&mut self) {
        self.rec.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

fn boot(name: &str) -> BootConfig {
    BootConfig::new(Vec::new(), name)
}

fn wait_for(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

fn sample(action: RawAction, finger: u32, x: f32) -> RawSample {
    RawSample::new(action, vec![RawContact::new(finger, x, 10.0)])
}

#[test]
fn script_calls_never_overlap_and_stay_on_one_thread() {
    const FINGERS: u32 = 4;
    const MOVES: usize = 100;

    let config = boot("serialized.js");
    let rec = recorder(&config.boot_script);
    let render = RenderThread::<InstrumentedHost>::spawn(config, 240).unwrap();

    let messages = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&messages);
    let mut view = render.view();
    view.set_observer(Some(Box::new(move |key: &str, value: MessageValue| {
        assert_eq!(key, "frame");
        assert!(value.as_number().is_some());
        counter.fetch_add(1, Ordering::SeqCst);
    })));
    view.surface_created(SurfaceSize::new(100, 100));

    let capture: Vec<_> = (0..FINGERS)
        .map(|finger| {
            let view = view.clone();
            thread::spawn(move || {
                view.on_touch_event(&sample(RawAction::Down, finger, 0.0));
                for i in 0..MOVES {
                    view.on_touch_event(&sample(RawAction::Move, finger, i as f32));
                }
                view.on_touch_event(&sample(RawAction::Up, finger, 0.0));
            })
        })
        .collect();
    for handle in capture {
        handle.join().unwrap();
    }

    let expected = FINGERS as usize * (MOVES + 2);
    wait_for("all touches", || rec.touches.lock().unwrap().len() == expected);
    wait_for("messages", || messages.load(Ordering::SeqCst) > 0);
    let frames = render.shutdown();

    assert_eq!(rec.overlaps.load(Ordering::SeqCst), 0);
    let threads = rec.threads.lock().unwrap().clone();
    assert_eq!(threads.len(), 1);
    assert!(!threads.contains(&thread::current().id()));
    assert_eq!(rec.launches.load(Ordering::SeqCst), 1);
    assert_eq!(rec.teardowns.load(Ordering::SeqCst), 1);
    assert!(frames > 0);

    // Each finger's gesture arrives whole and in order.
    let touches = rec.touches();
    for finger in 0..FINGERS {
        let phases: Vec<_> = touches
            .iter()
            .filter(|(f, _, _)| *f == finger)
            .map(|(_, down, phase)| (*down, *phase))
            .collect();
        assert_eq!(phases.len(), MOVES + 2);
        assert_eq!(phases.first(), Some(&(true, "down")));
        assert_eq!(phases.last(), Some(&(false, "up")));
        assert!(phases[1..=MOVES].iter().all(|p| *p == (true, "move")));
    }
}

#[test]
fn shutdown_runs_queued_work_first() {
    let config = boot("shutdown.js");
    let rec = recorder(&config.boot_script);
    let render = RenderThread::<InstrumentedHost>::spawn(config, 60).unwrap();

    let mut view = render.view();
    view.surface_created(SurfaceSize::new(10, 10));
    view.on_touch_event(&sample(RawAction::Down, 0, 1.0));
    view.on_touch_event(&sample(RawAction::Cancel, 0, 1.0));
    render.shutdown();

    assert_eq!(rec.touches(), vec![(0, true, "down"), (0, false, "cancel")]);
    assert_eq!(rec.teardowns.load(Ordering::SeqCst), 1);

    // The thread is gone; the view keeps accepting input quietly.
    assert!(view.on_touch_event(&sample(RawAction::Down, 0, 1.0)));
}

#[test]
fn surface_recreation_boots_a_fresh_context() {
    let config = boot("recreate.js");
    let rec = recorder(&config.boot_script);
    let render = RenderThread::<InstrumentedHost>::spawn(config, 120).unwrap();

    let mut view = render.view();
    view.surface_created(SurfaceSize::new(10, 10));
    wait_for("first launch", || rec.launches.load(Ordering::SeqCst) == 1);
    view.surface_destroyed();
    view.surface_created(SurfaceSize::new(20, 20));
    wait_for("second launch", || rec.launches.load(Ordering::SeqCst) == 2);

    assert_eq!(rec.teardowns.load(Ordering::SeqCst), 1);
    drop(render);
    assert_eq!(rec.teardowns.load(Ordering::SeqCst), 2);
}
