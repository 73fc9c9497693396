//! Module resolution against registered search paths
//!
//! A bare module name `foo` is looked up as `<dir>/foo.js`, then
//! `<dir>/foo/init.js`, for each registered directory in order. Names that
//! nothing matches fall back to the working directory. `./` and `../` names
//! resolve next to the importing module.

use rquickjs::loader::Resolver;
use rquickjs::Ctx;
use std::path::{Component, Path, PathBuf};

pub const SCRIPT_EXTENSION: &str = "js";
pub const INIT_MODULE: &str = "init";

#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    paths: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// First existing file for `name` as imported from module `base`.
    pub fn locate(&self, base: &str, name: &str) -> Option<PathBuf> {
        if is_relative(name) {
            let dir = Path::new(base).parent().unwrap_or_else(|| Path::new(""));
            return first_file(dir, name);
        }

        self.paths
            .iter()
            .find_map(|dir| first_file(dir, name))
            .or_else(|| first_file(Path::new(""), name))
    }
}

impl Resolver for SearchPathResolver {
    fn resolve<'js>(&mut self, _ctx: &Ctx<'js>, base: &str, name: &str) -> rquickjs::Result<String> {
        match self.locate(base, name) {
            Some(path) => {
                let resolved = path.to_string_lossy().into_owned();
                tracing::trace!(base, name, resolved = %resolved, "resolved script module");
                Ok(resolved)
            }
            None => {
                tracing::debug!(base, name, searched = self.paths.len(), "script module not found");
                Err(rquickjs::Error::new_resolving(base, name))
            }
        }
    }
}

fn is_relative(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../")
}

fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let suffix = format!(".{SCRIPT_EXTENSION}");
    if name.ends_with(&suffix) {
        return vec![dir.join(name)];
    }
    vec![
        dir.join(format!("{name}{suffix}")),
        dir.join(name).join(format!("{INIT_MODULE}{suffix}")),
    ]
}

fn first_file(dir: &Path, name: &str) -> Option<PathBuf> {
    candidates(dir, name)
        .into_iter()
        .map(|path| normalize(&path))
        .find(|path| path.is_file())
}

/// Lexically folds `.` and `..` so one file always maps to one module name.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export default 1;").unwrap();
    }

    #[test]
    fn prefers_file_then_init_per_directory() {
        let root = tempfile::tempdir().unwrap();
        let first = root.path().join("first");
        let second = root.path().join("second");
        touch(&first.join("input/init.js"));
        touch(&second.join("input.js"));

        let resolver = SearchPathResolver::new(vec![first.clone(), second.clone()]);
        // Directory order wins over the file/init order.
        assert_eq!(resolver.locate("boot.js", "input"), Some(first.join("input/init.js")));

        let resolver = SearchPathResolver::new(vec![second.clone(), first]);
        assert_eq!(resolver.locate("boot.js", "input"), Some(second.join("input.js")));
    }

    #[test]
    fn file_beats_init_in_same_directory() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("util.js"));
        touch(&root.path().join("util/init.js"));

        let resolver = SearchPathResolver::new(vec![root.path().to_path_buf()]);
        assert_eq!(resolver.locate("boot.js", "util"), Some(root.path().join("util.js")));
    }

    #[test]
    fn relative_names_resolve_next_to_importer() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("lib/vector.js"));
        let base = root.path().join("lib/input/init.js");

        let resolver = SearchPathResolver::default();
        assert_eq!(
            resolver.locate(&base.to_string_lossy(), "../vector"),
            Some(root.path().join("lib/vector.js"))
        );
    }

    #[test]
    fn explicit_extension_is_not_suffixed() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("menu.js"));

        let resolver = SearchPathResolver::new(vec![root.path().to_path_buf()]);
        assert_eq!(resolver.locate("boot.js", "menu.js"), Some(root.path().join("menu.js")));
    }

    #[test]
    fn unknown_module_is_none() {
        let root = tempfile::tempdir().unwrap();
        let resolver = SearchPathResolver::new(vec![root.path().to_path_buf()]);
        assert_eq!(resolver.locate("boot.js", "definitely_not_here_4821"), None);
    }

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/b/./../c.js")), PathBuf::from("/a/c.js"));
        assert_eq!(normalize(Path::new("../x.js")), PathBuf::from("../x.js"));
    }
}
