//! Global type resolution across every file in a request.
//!
//! The tree mirrors protobuf scoping: one node per package component and one
//! per message, each holding the messages and enums declared directly in it.
//! It is built once before any code is emitted and only read afterwards.

use std::collections::BTreeMap;

use tracing::trace;

use crate::descriptor::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};
use crate::Error;

/// A message or enum declaration.
#[derive(Debug, Clone, Copy)]
pub enum TypeDescriptor<'a> {
    Message(&'a DescriptorProto),
    Enum(&'a EnumDescriptorProto),
}

impl<'a> TypeDescriptor<'a> {
    /// The message descriptor, if this is a message.
    pub fn as_message(&self) -> Option<&'a DescriptorProto> {
        match self {
            TypeDescriptor::Message(dp) => Some(dp),
            TypeDescriptor::Enum(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Declaration<'a> {
    descriptor: TypeDescriptor<'a>,
    file: &'a FileDescriptorProto,
}

/// One package or message scope.
#[derive(Debug, Default)]
pub struct Namespace<'a> {
    /// Fully-qualified name with a leading dot, empty for the root.
    fq_name: String,
    children: BTreeMap<String, Namespace<'a>>,
    types: BTreeMap<String, Declaration<'a>>,
}

/// The result of resolving a fully-qualified type reference.
#[derive(Debug, Clone)]
pub struct ResolvedType<'a> {
    /// Fully-qualified name of the enclosing scope, e.g. `.pkg.Outer`.
    pub scope: String,
    /// The simple name, e.g. `Inner`.
    pub name: String,
    pub descriptor: TypeDescriptor<'a>,
    /// The file declaring the type.
    pub file: &'a FileDescriptorProto,
}

impl ResolvedType<'_> {
    /// The dotted fully-qualified name, e.g. `.pkg.Outer.Inner`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.scope, self.name)
    }

    /// The name relative to the declaring file's package, e.g. `Outer.Inner`.
    ///
    /// Generated modules export types by this path.
    pub fn local_name(&self) -> String {
        let package = package_path(self.file.package());
        let nesting = self
            .scope
            .strip_prefix(package.as_str())
            .unwrap_or(&self.scope)
            .trim_start_matches('.');
        if nesting.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", nesting, self.name)
        }
    }
}

impl<'a> Namespace<'a> {
    /// Create an empty root namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a namespace over all of the provided files.
    pub fn from_files(files: impl IntoIterator<Item = &'a FileDescriptorProto>) -> Self {
        let mut root = Self::new();
        for file in files {
            root.parse(file);
        }
        root
    }

    /// Fully-qualified name of this scope, `.` for the root.
    pub fn fq_name(&self) -> &str {
        if self.fq_name.is_empty() {
            "."
        } else {
            &self.fq_name
        }
    }

    /// Register a file's package and every message and enum it declares.
    ///
    /// Repeated calls accumulate; files sharing a package share its node.
    pub fn parse(&mut self, file: &'a FileDescriptorProto) {
        let mut scope = self;
        for component in file.package().split('.').filter(|c| !c.is_empty()) {
            scope = scope.child(component);
        }

        for message in &file.message_type {
            scope.register_message(file, message);
        }
        for enum_type in &file.enum_type {
            scope.register_enum(file, enum_type);
        }
    }

    fn child(&mut self, name: &str) -> &mut Namespace<'a> {
        let fq_name = format!("{}.{}", self.fq_name, name);
        self.children
            .entry(name.to_string())
            .or_insert_with(|| Namespace {
                fq_name,
                children: BTreeMap::new(),
                types: BTreeMap::new(),
            })
    }

    fn register_message(&mut self, file: &'a FileDescriptorProto, message: &'a DescriptorProto) {
        let name = message.name();
        trace!(scope = self.fq_name(), name, "registering message");
        self.types.insert(
            name.to_string(),
            Declaration {
                descriptor: TypeDescriptor::Message(message),
                file,
            },
        );

        let scope = self.child(name);
        for nested in &message.nested_type {
            scope.register_message(file, nested);
        }
        for enum_type in &message.enum_type {
            scope.register_enum(file, enum_type);
        }
    }

    fn register_enum(&mut self, file: &'a FileDescriptorProto, enum_type: &'a EnumDescriptorProto) {
        trace!(scope = self.fq_name(), name = enum_type.name(), "registering enum");
        self.types.insert(
            enum_type.name().to_string(),
            Declaration {
                descriptor: TypeDescriptor::Enum(enum_type),
                file,
            },
        );
    }

    /// Find a package or message scope by its fully-qualified name.
    ///
    /// `"."` and `""` name the root.
    pub fn find_namespace(&self, path: &str) -> Result<&Namespace<'a>, Error> {
        let mut scope = self;
        for component in path.split('.').filter(|c| !c.is_empty()) {
            scope = scope
                .children
                .get(component)
                .ok_or_else(|| Error::UnknownNamespace(path.to_string()))?;
        }
        Ok(scope)
    }

    /// Resolve a fully-qualified type reference such as `.pkg.Outer.Inner`.
    ///
    /// The reference is split into the longest prefix naming a registered
    /// scope and a trailing simple name declared in that scope. Returns
    /// `None` when no such split exists.
    pub fn find_name(&self, type_name: &str) -> Option<ResolvedType<'a>> {
        let components: Vec<&str> = type_name.split('.').filter(|c| !c.is_empty()).collect();
        let (name, qualifiers) = components.split_last()?;

        let mut scope = self;
        for component in qualifiers {
            scope = scope.children.get(*component)?;
        }

        let declaration = scope.types.get(*name)?;
        Some(ResolvedType {
            scope: scope.fq_name.clone(),
            name: name.to_string(),
            descriptor: declaration.descriptor,
            file: declaration.file,
        })
    }

    /// Like [`Namespace::find_name`], failing with an error naming the
    /// referencing file.
    pub fn resolve(&self, type_name: &str, from: &FileDescriptorProto) -> Result<ResolvedType<'a>, Error> {
        self.find_name(type_name).ok_or_else(|| Error::UnresolvedType {
            type_name: type_name.to_string(),
            file: from.name().to_string(),
        })
    }
}

/// The fully-qualified path of a package, empty for the default package.
pub fn package_path(package: &str) -> String {
    if package.is_empty() {
        String::new()
    } else {
        format!(".{}", package)
    }
}
