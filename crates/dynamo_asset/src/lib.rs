//! Dynamo Asset Pipeline
//!
//! Installs bundled resources into a writable directory and resolves paths
//! inside it. Scripts are loaded from the installed copy, never the bundle.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional script directory beneath the resource directory.
pub const SCRIPT_SUBDIR: &str = "DynamoScripts";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no resource bundle configured")]
    MissingBundle,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AssetError + '_ {
    move |source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Bundle → resource directory installer and path resolver
#[derive(Debug, Clone)]
pub struct ResourceManager {
    bundle_dir: Option<PathBuf>,
    resource_dir: PathBuf,
}

impl ResourceManager {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundle_dir: None,
            resource_dir: resource_dir.into(),
        }
    }

    pub fn with_bundle(mut self, bundle_dir: impl Into<PathBuf>) -> Self {
        self.bundle_dir = Some(bundle_dir.into());
        self
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    pub fn script_dir(&self) -> PathBuf {
        self.resource_dir.join(SCRIPT_SUBDIR)
    }

    /// `<resource_dir>[/<subdir>]/<name>[.<ext>]`
    pub fn path_for_resource(&self, name: &str, ext: Option<&str>, subdir: Option<&str>) -> PathBuf {
        let mut path = self.resource_dir.clone();
        if let Some(subdir) = subdir {
            path.push(subdir);
        }
        match ext {
            Some(ext) => path.push(format!("{name}.{ext}")),
            None => path.push(name),
        }
        path
    }

    /// Copies the whole bundle into the resource directory, replacing
    /// existing files. Meant to run after installation or updates, before
    /// the first script context boots.
    pub fn install(&self) -> Result<InstallReport, AssetError> {
        let bundle = self.bundle_dir.as_deref().ok_or(AssetError::MissingBundle)?;
        let mut report = InstallReport::default();
        copy_tree(bundle, &self.resource_dir, &mut report)?;
        tracing::info!(
            bundle = %bundle.display(),
            target = %self.resource_dir.display(),
            files = report.files_copied,
            bytes = report.bytes_copied,
            "installed resources"
        );
        Ok(report)
    }
}

fn copy_tree(from: &Path, to: &Path, report: &mut InstallReport) -> Result<(), AssetError> {
    fs::create_dir_all(to).map_err(io_error(to))?;

    for entry in fs::read_dir(from).map_err(io_error(from))? {
        let entry = entry.map_err(io_error(from))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(io_error(&source))?;

        if file_type.is_dir() {
            copy_tree(&source, &target, report)?;
        } else {
            let bytes = fs::copy(&source, &target).map_err(io_error(&source))?;
            tracing::trace!(file = %target.display(), bytes, "copied resource");
            report.files_copied += 1;
            report.bytes_copied += bytes;
        }
    }
    Ok(())
}
