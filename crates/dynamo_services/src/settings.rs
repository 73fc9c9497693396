//! Settings management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where [`Settings::load_or_default`] got its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOrigin {
    File,
    /// The file does not exist.
    Defaults,
}

/// Host settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub script: ScriptSettings,
    pub frame: FrameSettings,
    pub logging: LoggingSettings,
    pub observer: ObserverSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Where scripts live and how the runtime boots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Directory bundled resources are installed from. `None` skips installation.
    pub bundle_dir: Option<PathBuf>,
    /// Directory resources are installed into and scripts are loaded from.
    pub resource_dir: PathBuf,
    /// Conventional script directory beneath `resource_dir`.
    pub script_subdir: String,
    /// Boot script, relative to `resource_dir`.
    pub boot_script: String,
    /// Searched after the resource and script directories.
    pub extra_search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    pub target_fps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverSettings {
    /// Print one JSON object per frame message to stdout.
    pub json_lines: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Dynamo".to_string(),
            width: 480,
            height: 800,
        }
    }
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            bundle_dir: None,
            resource_dir: PathBuf::from("GameResources"),
            script_subdir: "DynamoScripts".to_string(),
            boot_script: "boot.js".to_string(),
            extra_search_paths: Vec::new(),
        }
    }
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ScriptSettings {
    pub fn script_dir(&self) -> PathBuf {
        self.resource_dir.join(&self.script_subdir)
    }

    pub fn boot_script_path(&self) -> PathBuf {
        self.resource_dir.join(&self.boot_script)
    }

    /// Module search order: resource dir, its script subdirectory, extras.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.resource_dir.clone(), self.script_dir()];
        paths.extend(self.extra_search_paths.iter().cloned());
        paths
    }
}

impl Settings {
    pub fn from_json(source: &str, path: &Path) -> Result<Self, SettingsError> {
        serde_json::from_str(source).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source, path)
    }

    /// Like [`Settings::load`], but a missing file means defaults. Logging
    /// is usually configured from the result, so reporting which one it was
    /// is left to the caller.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<(Self, SettingsOrigin), SettingsError> {
        match Self::load(path) {
            Ok(settings) => Ok((settings, SettingsOrigin::File)),
            Err(SettingsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Ok((Self::default(), SettingsOrigin::Defaults))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings = Settings::from_json(
            r#"{ "script": { "resource_dir": "/data/res" }, "frame": { "target_fps": 30 } }"#,
            Path::new("inline.json"),
        )
        .unwrap();

        assert_eq!(settings.frame.target_fps, 30);
        assert_eq!(settings.script.resource_dir, PathBuf::from("/data/res"));
        assert_eq!(settings.script.script_subdir, "DynamoScripts");
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn search_paths_are_ordered() {
        let script = ScriptSettings {
            resource_dir: PathBuf::from("/res"),
            extra_search_paths: vec![PathBuf::from("/lib")],
            ..ScriptSettings::default()
        };
        assert_eq!(
            script.search_paths(),
            vec![
                PathBuf::from("/res"),
                PathBuf::from("/res/DynamoScripts"),
                PathBuf::from("/lib")
            ]
        );
        assert_eq!(script.boot_script_path(), PathBuf::from("/res/boot.js"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Settings::from_json("{ nope", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, origin) = Settings::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(origin, SettingsOrigin::Defaults);
    }

    #[test]
    fn present_file_is_reported_as_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynamo.json");
        std::fs::write(&path, r#"{ "frame": { "target_fps": 24 } }"#).unwrap();

        let (settings, origin) = Settings::load_or_default(&path).unwrap();
        assert_eq!(settings.frame.target_fps, 24);
        assert_eq!(origin, SettingsOrigin::File);
    }

    #[test]
    fn unreadable_file_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file.
        let err = Settings::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynamo.json");
        std::fs::write(&path, r#"{ "observer": { "json_lines": true } }"#).unwrap();
        assert!(Settings::load(&path).unwrap().observer.json_lines);
    }
}
