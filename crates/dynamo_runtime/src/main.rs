//! Dynamo Runtime
//!
//! Desktop host: installs the resource bundle, starts the render thread and
//! feeds it touches from a window.
//!
//! Usage: `dynamo [settings.json]` (defaults to `dynamo.json`)

mod logging;
mod observer;

use anyhow::{Context, Result};
use dynamo_asset::ResourceManager;
use dynamo_render::winit::event_loop::EventLoop;
use dynamo_render::{DesktopApp, RenderThread, WindowConfig};
use dynamo_script::{BootConfig, RuntimeBridge};
use dynamo_services::{Settings, SettingsOrigin};
use observer::LogObserver;
use std::path::PathBuf;

const DEFAULT_SETTINGS: &str = "dynamo.json";

fn main() -> Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));
    let (settings, origin) = Settings::load_or_default(&settings_path)?;

    logging::init_logging(&settings.logging.level);
    tracing::info!("Dynamo v{}", dynamo_core::VERSION);
    match origin {
        SettingsOrigin::File => {
            tracing::info!(path = %settings_path.display(), "settings loaded");
        }
        SettingsOrigin::Defaults => {
            tracing::warn!(path = %settings_path.display(), "settings file not found, using defaults");
        }
    }

    install_resources(&settings);

    let boot = BootConfig::new(
        settings.script.search_paths(),
        settings.script.boot_script_path(),
    );
    let render = RenderThread::<RuntimeBridge>::spawn(boot, settings.frame.target_fps)
        .context("failed to start render thread")?;

    let view = render.view();
    view.set_observer(Some(Box::new(LogObserver::stdout(
        settings.observer.json_lines,
    ))));

    let config = WindowConfig {
        title: settings.window.title.clone(),
        width: settings.window.width,
        height: settings.window.height,
    };
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = DesktopApp::new(config, view);
    event_loop.run_app(&mut app).context("event loop failed")?;

    let frames = render.shutdown();
    tracing::info!(frames, "shut down");
    Ok(())
}

/// A failed install is logged; whatever is already installed still boots.
fn install_resources(settings: &Settings) {
    let Some(bundle) = &settings.script.bundle_dir else {
        tracing::debug!("no resource bundle configured, using installed resources");
        return;
    };

    let resources = ResourceManager::new(&settings.script.resource_dir).with_bundle(bundle);
    if let Err(err) = resources.install() {
        tracing::error!(
            bundle = %bundle.display(),
            error = %err,
            "failed to install resources"
        );
    }
}
