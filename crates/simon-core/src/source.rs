//! Source access: mapping unit names to source text.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, warn};

/// Provides the text of source units by name.
pub trait SourceAccess {
    /// Returns the content of unit `name`, or `None` if no such unit exists.
    fn fetch(&self, name: &str) -> Option<String>;

    /// Names of the units this provider knows up front.
    ///
    /// Providers that discover units lazily may return an empty list.
    fn names(&self) -> Vec<String>;
}

impl<T: SourceAccess + ?Sized> SourceAccess for &T {
    fn fetch(&self, name: &str) -> Option<String> {
        (**self).fetch(name)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

/// Units held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    units: IndexMap<String, String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a unit.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.units.insert(name.into(), text.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl SourceAccess for MemorySources {
    fn fetch(&self, name: &str) -> Option<String> {
        self.units.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.units.keys().cloned().collect()
    }
}

/// Units stored as files under a root directory.
///
/// Unit `a.b.c` maps to `<root>/a/b/c.<extension>`. A unit whose name is an
/// existing relative file path (such as `main.simon`) is read directly.
#[derive(Debug, Clone)]
pub struct DirectorySources {
    root: PathBuf,
    extension: String,
}

impl DirectorySources {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file a unit name maps to.
    pub fn path_of(&self, name: &str) -> PathBuf {
        let direct = self.root.join(name);
        if direct.is_file() {
            return direct;
        }
        let mut path = self.root.clone();
        for component in name.split('.') {
            path.push(component);
        }
        path.set_extension(&self.extension);
        path
    }

    fn unit_names(&self, dir: &Path, prefix: &str, names: &mut Vec<String>) -> io::Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|entry| entry.file_name());
        for entry in entries {
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = if prefix.is_empty() {
                stem.to_string()
            } else {
                format!("{prefix}.{stem}")
            };
            if path.is_dir() {
                self.unit_names(&path, &name, names)?;
            } else if path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str()) {
                names.push(name);
            }
        }
        Ok(())
    }
}

impl SourceAccess for DirectorySources {
    fn fetch(&self, name: &str) -> Option<String> {
        let path = self.path_of(name);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(unit = name, path = path.display().to_string(); "Read source unit");
                Some(text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(
                    unit = name,
                    path = path.display().to_string(),
                    err = err.to_string();
                    "Failed to read source unit"
                );
                None
            }
        }
    }

    fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Err(err) = self.unit_names(&self.root, "", &mut names) {
            warn!(
                root = self.root.display().to_string(),
                err = err.to_string();
                "Failed to list source units"
            );
        }
        names
    }
}

/// Two providers consulted in order: `first`, then `second`.
///
/// The driver layers the metamodel's built-in units over the caller's
/// provider so built-in names always win.
#[derive(Debug, Clone)]
pub struct Layered<A, B> {
    first: A,
    second: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: SourceAccess, B: SourceAccess> SourceAccess for Layered<A, B> {
    fn fetch(&self, name: &str) -> Option<String> {
        self.first.fetch(name).or_else(|| self.second.fetch(name))
    }

    fn names(&self) -> Vec<String> {
        let mut names = self.first.names();
        for name in self.second.names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
