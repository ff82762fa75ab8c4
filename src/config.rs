//! Configuration for TypeScript code generation.

use std::path::{Path, PathBuf};

use crate::descriptor::FileDescriptorSet;
use crate::Error;

/// Runtime module imported when no `library_import` is given.
pub const DEFAULT_LIBRARY_IMPORT: &str = "protobuf";

/// Generation options, as passed to the plugin in protoc's parameter string
/// (`--ts_opt=plugin=grpc,library_import=...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Emit client stubs for services.
    pub grpc: bool,
    /// Module path of the TypeScript runtime.
    pub library_import: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            grpc: false,
            library_import: DEFAULT_LIBRARY_IMPORT.to_string(),
        }
    }
}

impl Options {
    /// Parse a comma-separated parameter string.
    ///
    /// Empty entries are ignored; anything unrecognized is an error.
    pub fn parse(parameter: &str) -> Result<Self, Error> {
        let mut options = Self::default();
        for param in parameter.split(',').filter(|p| !p.is_empty()) {
            if param == "plugin=grpc" {
                options.grpc = true;
            } else if let Some(path) = param.strip_prefix("library_import=") {
                options.library_import = path.to_string();
            } else {
                return Err(Error::UnknownOption(param.to_string()));
            }
        }
        Ok(options)
    }
}

/// Configuration for running the generator directly on `.proto` files.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output directory for generated files.
    pub(crate) out_dir: Option<PathBuf>,

    /// Path to the protoc executable.
    pub(crate) protoc_path: Option<PathBuf>,

    /// Additional arguments for protoc.
    pub(crate) protoc_args: Vec<String>,

    /// Skip running protoc, use pre-existing FileDescriptorSet.
    pub(crate) skip_protoc: bool,

    /// Path to read the FileDescriptorSet from when protoc is skipped.
    pub(crate) file_descriptor_set_path: Option<PathBuf>,

    pub(crate) options: Options,
}

impl Config {
    /// Create a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory for generated TypeScript files.
    ///
    /// Defaults to `$OUT_DIR`.
    pub fn out_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set path to the protoc executable.
    pub fn protoc_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.protoc_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add an argument to pass to protoc.
    pub fn protoc_arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.protoc_args.push(arg.into());
        self
    }

    /// Skip running protoc; use an existing FileDescriptorSet instead.
    pub fn skip_protoc_run(&mut self) -> &mut Self {
        self.skip_protoc = true;
        self
    }

    /// Path of the FileDescriptorSet used with [`Config::skip_protoc_run`].
    pub fn file_descriptor_set_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.file_descriptor_set_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Emit client stubs for services.
    pub fn grpc(&mut self, enabled: bool) -> &mut Self {
        self.options.grpc = enabled;
        self
    }

    /// Module path generated code imports the runtime from.
    pub fn library_import(&mut self, path: impl Into<String>) -> &mut Self {
        self.options.library_import = path.into();
        self
    }

    /// Compile `.proto` files into TypeScript files.
    ///
    /// `protos` are generated; their imports are only used for resolution.
    pub fn compile_protos(
        &self,
        protos: &[impl AsRef<Path>],
        includes: &[impl AsRef<Path>],
    ) -> Result<(), Error> {
        crate::codegen::compile(self, protos, includes)
    }

    /// Compile the named `files` from an existing FileDescriptorSet.
    ///
    /// The set must also contain every file they import.
    pub fn compile_fds(&self, fds: FileDescriptorSet, files: &[impl AsRef<str>]) -> Result<(), Error> {
        crate::codegen::compile_fds(self, fds, files)
    }
}
