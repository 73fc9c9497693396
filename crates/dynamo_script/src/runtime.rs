//! Script runtime management
//!
//! One [`RuntimeBridge`] owns one QuickJS runtime and context. It is `!Send`:
//! create it on the render thread and keep it there. Every call takes
//! `&mut self`, so the context can never be entered re-entrantly from Rust.
//!
//! Entry points the boot script must publish on `globalThis.dynamo`:
//! - `cycle()`: once per frame, may return an object of messages
//! - `input.manager.postTouchEvent(manager, finger, isDown, x, y, phase)`

use crate::error::{CallError, InitError};
use crate::ffi::{self, TouchArgs};
use crate::loader::SearchPathResolver;
use dynamo_core::{FrameResult, PointerEvent};
use rquickjs::function::This;
use rquickjs::loader::ScriptLoader;
use rquickjs::{CatchResultExt, CaughtError, Context, Ctx, Function, Module, Object, Runtime, Value};
use std::path::{Path, PathBuf};

pub const CYCLE_ENTRY: [&str; 2] = ["dynamo", "cycle"];
pub const TOUCH_ENTRY: [&str; 4] = ["dynamo", "input", "manager", "postTouchEvent"];

/// Upper bound on promise jobs run after one host call. A job chain that keeps
/// rescheduling itself resumes after the next call.
const MAX_PENDING_JOBS: usize = 1024;

/// What a context needs to boot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootConfig {
    /// Module search directories, highest priority first.
    pub search_paths: Vec<PathBuf>,
    pub boot_script: PathBuf,
}

impl BootConfig {
    pub fn new(search_paths: Vec<PathBuf>, boot_script: impl Into<PathBuf>) -> Self {
        Self {
            search_paths,
            boot_script: boot_script.into(),
        }
    }
}

/// What the render role drives once per frame.
pub trait ScriptHost: Sized {
    /// Creates and boots a fresh context.
    fn launch(boot: &BootConfig) -> Result<Self, InitError>;

    fn inject_touch(&mut self, event: &PointerEvent) -> Result<(), CallError>;

    fn run_frame_cycle(&mut self) -> Result<Option<FrameResult>, CallError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    Ready,
    /// Boot failed. Nothing but dropping the bridge is meaningful now.
    Failed,
}

/// Script execution context
pub struct RuntimeBridge {
    context: Context,
    runtime: Runtime,
    state: BridgeState,
}

impl RuntimeBridge {
    pub fn new() -> Result<Self, InitError> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;

        // Scripts log through the host.
        context.with(|ctx| {
            let print = Function::new(ctx.clone(), |msg: String| {
                tracing::info!(target: "dynamo::script", "{msg}");
            })?;
            ctx.globals().set("print", print)?;
            Ok::<_, rquickjs::Error>(())
        })?;

        Ok(Self {
            context,
            runtime,
            state: BridgeState::Uninitialized,
        })
    }

    pub fn launch(boot: &BootConfig) -> Result<Self, InitError> {
        let mut bridge = Self::new()?;
        bridge.initialize(&boot.search_paths, &boot.boot_script)?;
        Ok(bridge)
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Registers the module search paths and runs the boot script as an ES
    /// module. Allowed once per bridge: any later call is rejected without
    /// touching the runtime.
    pub fn initialize(&mut self, search_paths: &[PathBuf], boot_script: &Path) -> Result<(), InitError> {
        if self.state != BridgeState::Uninitialized {
            tracing::warn!(state = ?self.state, "ignoring repeated script context initialization");
            return Err(InitError::AlreadyInitialized);
        }
        // Whatever happens below, this context boots at most once.
        self.state = BridgeState::Failed;

        self.runtime.set_loader(
            SearchPathResolver::new(search_paths.to_vec()),
            ScriptLoader::default(),
        );

        let source = std::fs::read_to_string(boot_script).map_err(|source| {
            InitError::BootScriptUnreadable {
                path: boot_script.to_path_buf(),
                source,
            }
        })?;
        let name = boot_script.to_string_lossy().into_owned();

        self.context
            .with(|ctx| {
                Module::evaluate(ctx.clone(), name, source)
                    .and_then(|promise| promise.finish::<()>())
                    .catch(&ctx)
                    .map_err(|err| err.to_string())
            })
            .map_err(|message| InitError::BootFailed {
                path: boot_script.to_path_buf(),
                message,
            })?;

        self.state = BridgeState::Ready;
        self.run_pending_jobs();
        tracing::info!(
            boot = %boot_script.display(),
            search_paths = search_paths.len(),
            "script context initialized"
        );
        Ok(())
    }

    /// Evaluates `source` in global script scope. Usable before boot (host
    /// preludes) and after a successful one.
    pub fn execute_source(&mut self, source: &str) -> Result<(), CallError> {
        if self.state == BridgeState::Failed {
            return Err(CallError::NotReady);
        }
        let result = self.context.with(|ctx| {
            ctx.eval::<(), _>(source)
                .catch(&ctx)
                .map_err(|err| CallError::raised(&["<source>"], err))
        });
        self.run_pending_jobs();
        result
    }

    pub fn inject_touch(&mut self, event: &PointerEvent) -> Result<(), CallError> {
        self.ensure_ready()?;
        let args = TouchArgs::from(event);

        let result = self.context.with(|ctx| {
            let (manager, post) = entry_point(&ctx, &TOUCH_ENTRY)?;
            post.call::<_, ()>((
                This(manager.clone()),
                manager,
                args.finger,
                args.is_down,
                args.x,
                args.y,
                args.phase,
            ))
            .catch(&ctx)
            .map_err(|err| CallError::raised(&TOUCH_ENTRY, err))
        });
        self.run_pending_jobs();
        result
    }

    pub fn run_frame_cycle(&mut self) -> Result<Option<FrameResult>, CallError> {
        self.ensure_ready()?;

        let result = self.context.with(|ctx| {
            let (_, cycle) = entry_point(&ctx, &CYCLE_ENTRY)?;
            let value = cycle
                .call::<_, Value>(())
                .catch(&ctx)
                .map_err(|err| CallError::raised(&CYCLE_ENTRY, err))?;
            ffi::frame_result(&value)
                .catch(&ctx)
                .map_err(|err| CallError::raised(&CYCLE_ENTRY, err))
        });
        self.run_pending_jobs();
        result
    }

    /// Runs queued promise jobs. A job that throws is logged and the rest
    /// still run. Must not be called from inside `context.with`.
    fn run_pending_jobs(&self) {
        for _ in 0..MAX_PENDING_JOBS {
            match self.runtime.execute_pending_job() {
                Ok(true) => {}
                Ok(false) => return,
                Err(job) => {
                    let message = job
                        .0
                        .with(|ctx| CaughtError::from_error(&ctx, rquickjs::Error::Exception).to_string());
                    tracing::warn!(error = %message, "pending script job failed");
                }
            }
        }
        tracing::debug!(limit = MAX_PENDING_JOBS, "promise jobs left for the next call");
    }

    fn ensure_ready(&self) -> Result<(), CallError> {
        match self.state {
            BridgeState::Ready => Ok(()),
            _ => Err(CallError::NotReady),
        }
    }
}

impl ScriptHost for RuntimeBridge {
    fn launch(boot: &BootConfig) -> Result<Self, InitError> {
        RuntimeBridge::launch(boot)
    }

    fn inject_touch(&mut self, event: &PointerEvent) -> Result<(), CallError> {
        RuntimeBridge::inject_touch(self, event)
    }

    fn run_frame_cycle(&mut self) -> Result<Option<FrameResult>, CallError> {
        RuntimeBridge::run_frame_cycle(self)
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        tracing::debug!(state = ?self.state, "script context torn down");
    }
}

/// Walks `path` from the globals. Returns the function and the object that holds it.
fn entry_point<'js>(
    ctx: &Ctx<'js>,
    path: &[&str],
) -> Result<(Object<'js>, Function<'js>), CallError> {
    let Some((name, parents)) = path.split_last() else {
        return Err(CallError::missing(path));
    };

    let mut owner = ctx.globals();
    for segment in parents {
        owner = member(ctx, &owner, *segment, path)?
            .into_object()
            .ok_or_else(|| CallError::missing(path))?;
    }
    let function = member(ctx, &owner, *name, path)?
        .into_function()
        .ok_or_else(|| CallError::missing(path))?;
    Ok((owner, function))
}

/// A throwing getter is a script error, not a missing entry point.
fn member<'js>(
    ctx: &Ctx<'js>,
    owner: &Object<'js>,
    key: &str,
    path: &[&str],
) -> Result<Value<'js>, CallError> {
    owner
        .get::<_, Value>(key)
        .catch(ctx)
        .map_err(|err| CallError::raised(path, err))
}
