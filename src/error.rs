//! Error types for protoc-gen-ts.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while generating TypeScript from protobuf schemas.
///
/// Every variant is fatal: generation aborts and no output is produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Formatting generated source failed.
    #[error("failed to format generated source")]
    Fmt(#[from] std::fmt::Error),

    /// Failed to write a generated file.
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// protoc not found.
    #[error("protoc not found. Set PROTOC env var or install protoc.")]
    ProtocNotFound,

    /// protoc invocation failed.
    #[error("protoc failed: {}", truncate(.0))]
    ProtocFailed(String),

    /// Missing OUT_DIR environment variable.
    #[error("OUT_DIR not set. Run from build.rs or set out_dir().")]
    MissingOutDir,

    /// Missing file_descriptor_set_path when skip_protoc is set.
    #[error("file_descriptor_set_path required when skip_protoc is set")]
    MissingDescriptorPath,

    /// Malformed request or descriptor bytes.
    #[error("failed to decode {message}: {reason}")]
    Decode {
        message: &'static str,
        reason: String,
    },

    /// Invalid varint encoding.
    #[error("invalid varint encoding")]
    InvalidVarint,

    /// Unexpected end of buffer.
    #[error("unexpected end of buffer")]
    UnexpectedEof,

    /// Invalid wire type.
    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),

    /// Invalid UTF-8 in string field.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// Missing name field in a descriptor.
    #[error("missing name in {0} descriptor")]
    MissingName(&'static str),

    /// A file that is not proto3 was requested for generation.
    #[error("unsupported syntax: {syntax} in file {file}")]
    UnsupportedSyntax { syntax: String, file: String },

    /// Unrecognized entry in the plugin parameter string.
    #[error("unknown compiler option: {0}")]
    UnknownOption(String),

    /// A file requested for generation that the descriptors do not contain.
    #[error("{0} not found in the descriptor set")]
    FileNotFound(String),

    /// A package namespace that was never registered.
    #[error("unable to find namespace for: {0}")]
    UnknownNamespace(String),

    /// A fully-qualified type reference that no input file declares.
    #[error("unable to resolve type {type_name} referenced from {file}")]
    UnresolvedType { type_name: String, file: String },

    /// A same-file reference that an enclosing message redeclares, so the
    /// generated name would bind to the wrong type.
    #[error("type {type_name} referenced from {file} is shadowed inside {scope}")]
    ShadowedType {
        type_name: String,
        scope: String,
        file: String,
    },

    /// A field whose type falls outside the proto3 scalar table.
    #[error("unexpected proto type {value} for field {field}")]
    InvalidFieldType { field: String, value: i32 },

    /// A map entry message without its key/value pair.
    #[error("map entry {0} must declare exactly a key and a value field")]
    MalformedMapEntry(String),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Truncate very long protoc output to keep messages readable.
fn truncate(msg: &str) -> String {
    const MAX_LEN: usize = 1000;
    if msg.len() > MAX_LEN {
        let mut end = MAX_LEN;
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &msg[..end])
    } else {
        msg.to_string()
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8
    }
}
