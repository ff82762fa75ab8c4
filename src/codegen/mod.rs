//! TypeScript generation from protobuf descriptors.

mod enumeration;
mod field;
mod message;
mod module;
mod oneof;
mod printer;
mod service;
mod types;

use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Component, Path};

use tracing::{debug, info, trace};

use crate::config::{Config, Options};
use crate::descriptor::{CodeGeneratorRequest, CodeGeneratorResponse, FileDescriptorProto, FileDescriptorSet, GeneratedFile};
use crate::namespace::{package_path, Namespace, ResolvedType};
use crate::protoc;
use crate::Error;

use self::module::{module_path, ModuleResolver};
use self::printer::Printer;

/// Alias the runtime library is imported under.
pub const RUNTIME_ALIAS: &str = "__pb__";

/// Marks where the import block goes; imports are only known once the whole
/// file has been emitted.
const IMPORT_PLACEHOLDER: &str = "!!!IMPORT_PLACEHOLDER!!!";

/// State shared by the emitters while one file is generated.
#[derive(Debug)]
pub struct FileContext<'a, 'n> {
    pub namespace: &'n Namespace<'a>,
    pub modules: ModuleResolver<'a>,
    pub file: &'a FileDescriptorProto,
    /// Enclosing message names of the declaration being emitted.
    pub scope: Vec<&'a str>,
    /// Set once anything emitted refers to the `long` module.
    pub uses_long: bool,
}

impl<'a, 'n> FileContext<'a, 'n> {
    pub fn new(namespace: &'n Namespace<'a>, file: &'a FileDescriptorProto) -> Self {
        Self {
            namespace,
            modules: ModuleResolver::new(file),
            file,
            scope: Vec::new(),
            uses_long: false,
        }
    }

    /// Resolve a fully-qualified type reference to the name generated code
    /// uses for it, importing the declaring module if needed.
    pub fn type_reference(&mut self, type_name: &str) -> Result<(String, ResolvedType<'a>), Error> {
        let resolved = self.namespace.resolve(type_name, self.file)?;
        trace!(reference = type_name, resolved = %resolved.full_name(), "resolved type");
        let local = resolved.local_name();
        let alias = self.modules.resolve(resolved.file).map(|m| m.alias.clone());
        let ts_name = match alias {
            Some(alias) => format!("{}.{}", alias, local),
            None => {
                self.check_shadowing(type_name, &local)?;
                local
            }
        };
        Ok((ts_name, resolved))
    }

    /// Same-file references are package-relative, so their first component
    /// must not be redeclared by any namespace enclosing the current scope.
    fn check_shadowing(&self, type_name: &str, local: &str) -> Result<(), Error> {
        let first = local.split('.').next().unwrap_or(local);
        let package = package_path(self.file.package());
        for depth in 1..=self.scope.len() {
            let enclosing = format!("{}.{}", package, self.scope[..depth].join("."));
            if self
                .namespace
                .find_name(&format!("{}.{}", enclosing, first))
                .is_some()
            {
                return Err(Error::ShadowedType {
                    type_name: type_name.to_string(),
                    scope: enclosing,
                    file: self.file.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Run the generator over a plugin request.
pub fn generate(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse, Error> {
    let options = Options::parse(request.parameter.as_deref().unwrap_or_default())?;
    if let Some(version) = &request.compiler_version {
        debug!(%version, "protoc version");
    }
    let file = generate_files(&request.proto_file, &request.file_to_generate, &options)?;
    Ok(CodeGeneratorResponse { error: None, file })
}

/// Generate every file in `files` whose name is listed in `to_generate`.
///
/// `files` must hold every requested file and everything they depend on.
/// Output follows the order of `files`.
pub fn generate_files(
    files: &[FileDescriptorProto],
    to_generate: &[impl AsRef<str>],
    options: &Options,
) -> Result<Vec<GeneratedFile>, Error> {
    let namespace = Namespace::from_files(files);
    let wanted: HashSet<&str> = to_generate.iter().map(AsRef::as_ref).collect();
    if let Some(missing) = to_generate
        .iter()
        .map(|name| name.as_ref())
        .find(|name: &&str| !files.iter().any(|file| file.name() == *name))
    {
        return Err(Error::FileNotFound(missing.to_string()));
    }

    files
        .iter()
        .filter(|file| wanted.contains(file.name()))
        .map(|file| generate_file(file, &namespace, options))
        .collect()
}

/// Generate the TypeScript module for a single `.proto` file.
fn generate_file(
    file: &FileDescriptorProto,
    namespace: &Namespace<'_>,
    options: &Options,
) -> Result<GeneratedFile, Error> {
    debug!(file = file.name(), "generating");
    if file.syntax() != "proto3" {
        return Err(Error::UnsupportedSyntax {
            syntax: file.syntax().to_string(),
            file: file.name().to_string(),
        });
    }
    namespace.find_namespace(&format!(".{}", file.package()))?;

    let mut ctx = FileContext::new(namespace, file);
    let mut w = Printer::new();

    writeln!(w, "// Generated by the protocol buffer compiler.  DO NOT EDIT!")?;
    writeln!(w, "// Source: {}", file.name())?;
    writeln!(w)?;
    writeln!(w, "{}", IMPORT_PLACEHOLDER)?;
    writeln!(w)?;

    for enum_type in &file.enum_type {
        enumeration::write_enum(&mut w, enum_type, &[])?;
    }
    for msg in &file.message_type {
        message::write_message(&mut w, &mut ctx, msg, &[])?;
    }
    if options.grpc {
        for svc in &file.service {
            service::write_service(&mut w, &mut ctx, svc, file.package())?;
        }
    }

    let mut imports = format!(
        "import * as {} from '{}'\n",
        RUNTIME_ALIAS, options.library_import
    );
    for module in ctx.modules.imports() {
        writeln!(imports, "import * as {} from '{}'", module.alias, module.path)?;
    }
    if ctx.uses_long {
        imports.push_str("import * as __long from 'long'\n");
    }

    let content = w.finish().replacen(IMPORT_PLACEHOLDER, &imports, 1);
    let name = format!("{}.ts", module_path(file.name()));
    info!(file = file.name(), output = %name, "generated");
    Ok(GeneratedFile { name, content })
}

/// Run protoc (or load a descriptor set) and generate `protos`.
pub fn compile(
    config: &Config,
    protos: &[impl AsRef<Path>],
    includes: &[impl AsRef<Path>],
) -> Result<(), Error> {
    let fds = if config.skip_protoc {
        let path = config
            .file_descriptor_set_path
            .as_ref()
            .ok_or(Error::MissingDescriptorPath)?;
        let bytes = std::fs::read(path)?;
        protoc::parse_file_descriptor_set(&bytes)?
    } else {
        let protoc_path = config
            .protoc_path
            .clone()
            .map(Ok)
            .unwrap_or_else(protoc::find_protoc)?;
        protoc::invoke_protoc(&protoc_path, protos, includes, &config.protoc_args)?
    };

    let names: Vec<String> = protos
        .iter()
        .map(|proto| descriptor_name(proto.as_ref(), includes))
        .collect();
    compile_fds(config, fds, names.as_slice())
}

/// Generate `files` from a descriptor set and write them to the output
/// directory.
pub fn compile_fds(
    config: &Config,
    fds: FileDescriptorSet,
    files: &[impl AsRef<str>],
) -> Result<(), Error> {
    let out_dir = config
        .out_dir
        .clone()
        .or_else(|| std::env::var_os("OUT_DIR").map(Into::into))
        .ok_or(Error::MissingOutDir)?;

    // Generate everything before writing so a failure leaves no output.
    let generated = generate_files(&fds.file, files, &config.options)?;
    for file in generated {
        write_output(&out_dir, &file)?;
    }
    Ok(())
}

fn write_output(out_dir: &Path, file: &GeneratedFile) -> Result<(), Error> {
    let path = out_dir.join(&file.name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&path, &file.content).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

/// The name protoc records for `proto`: its path relative to the first
/// include directory containing it.
fn descriptor_name(proto: &Path, includes: &[impl AsRef<Path>]) -> String {
    let relative = includes
        .iter()
        .find_map(|include| proto.strip_prefix(include.as_ref()).ok())
        .unwrap_or(proto);
    relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
