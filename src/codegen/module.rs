//! Cross-file imports for one generated module.

use std::collections::BTreeMap;

use tracing::debug;

use crate::descriptor::FileDescriptorProto;

/// An import of another generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    /// Identifier the module is bound to, e.g. `___dir_b_pb`.
    pub alias: String,
    /// Import specifier relative to the importing module, e.g. `./dir/b_pb`.
    pub path: String,
}

/// Tracks the modules referenced while one file is emitted.
#[derive(Debug)]
pub struct ModuleResolver<'a> {
    current: &'a FileDescriptorProto,
    references: BTreeMap<String, ModuleRef>,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(current: &'a FileDescriptorProto) -> Self {
        Self {
            current,
            references: BTreeMap::new(),
        }
    }

    /// The import needed to reach types declared in `target`, or `None` when
    /// `target` is the file being emitted.
    pub fn resolve(&mut self, target: &FileDescriptorProto) -> Option<&ModuleRef> {
        if target.name() == self.current.name() {
            return None;
        }

        if !self.references.contains_key(target.name()) {
            let current: &'a FileDescriptorProto = self.current;
            let current = current.name();
            let path = relative_path(parent_dir(current), &module_path(target.name()));
            let module = ModuleRef {
                alias: self.unique_alias(&path),
                path: format!("./{}", path),
            };
            debug!(file = current, alias = %module.alias, path = %module.path, "new module reference");
            self.references.insert(target.name().to_string(), module);
        }
        self.references.get(target.name())
    }

    /// `___` followed by `path` with separators flattened to `_`. Flattening
    /// can map distinct paths (`a-b`, `a_b`) to the same identifier, so later
    /// modules get a numeric suffix.
    fn unique_alias(&self, path: &str) -> String {
        let base = format!("___{}", path.replace(['/', '.', '-'], "_"));
        let taken = |alias: &str| self.references.values().any(|m| m.alias == alias);

        let mut alias = base.clone();
        let mut n = 1;
        while taken(&alias) {
            n += 1;
            alias = format!("{}_{}", base, n);
        }
        alias
    }

    /// All referenced modules, ordered by target file name.
    pub fn imports(&self) -> impl Iterator<Item = &ModuleRef> {
        self.references.values()
    }
}

/// The output module for a `.proto` file, without extension: `dir/a.proto`
/// becomes `dir/a_pb`.
pub fn module_path(proto_name: &str) -> String {
    let file_start = proto_name.rfind('/').map_or(0, |i| i + 1);
    let stem = match proto_name[file_start..].rfind('.') {
        Some(dot) => &proto_name[..file_start + dot],
        None => proto_name,
    };
    format!("{}_pb", stem)
}

fn parent_dir(name: &str) -> &str {
    name.rfind('/').map_or("", |i| &name[..i])
}

fn components(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

/// Path of `target` relative to the directory `base`. Both are relative to
/// the same root.
fn relative_path(base: &str, target: &str) -> String {
    let base = components(base);
    let target = components(target);
    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; base.len() - common];
    parts.extend_from_slice(&target[common..]);
    parts.join("/")
}
