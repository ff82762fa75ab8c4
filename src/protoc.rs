//! Protoc invocation utilities.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::descriptor::{decode_file_descriptor_set, FileDescriptorSet};
use crate::Error;

/// Find the protoc executable.
pub fn find_protoc() -> Result<PathBuf, Error> {
    // PROTOC takes precedence over PATH.
    if let Ok(path) = std::env::var("PROTOC") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    which::which("protoc").map_err(|_| Error::ProtocNotFound)
}

/// Invoke protoc to produce a FileDescriptorSet covering `protos` and
/// everything they import.
pub fn invoke_protoc(
    protoc: &Path,
    protos: &[impl AsRef<Path>],
    includes: &[impl AsRef<Path>],
    extra_args: &[String],
) -> Result<FileDescriptorSet, Error> {
    let tempdir = tempfile::tempdir()?;
    let descriptor_path = tempdir.path().join("descriptor.bin");

    let mut cmd = Command::new(protoc);
    for include in includes {
        cmd.arg("-I").arg(include.as_ref());
    }
    cmd.arg("--descriptor_set_out").arg(&descriptor_path);
    // Imports are needed to resolve cross-file references.
    cmd.arg("--include_imports");
    cmd.args(extra_args);
    for proto in protos {
        cmd.arg(proto.as_ref());
    }

    debug!(?cmd, "running protoc");
    let output = cmd.output()?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = if stdout.is_empty() {
            stderr.into_owned()
        } else if stderr.is_empty() {
            stdout.into_owned()
        } else {
            format!("{}\n{}", stdout, stderr)
        };
        return Err(Error::ProtocFailed(combined));
    }

    let descriptor_bytes = std::fs::read(&descriptor_path)?;
    decode_file_descriptor_set(&descriptor_bytes)
}

/// Parse a FileDescriptorSet from bytes.
pub fn parse_file_descriptor_set(bytes: &[u8]) -> Result<FileDescriptorSet, Error> {
    decode_file_descriptor_set(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protoc_failure_is_reported() {
        // `false` exits non-zero without output.
        let Ok(fake) = which::which("false") else {
            return;
        };
        let err = invoke_protoc(&fake, &["a.proto"], &["."], &[]).unwrap_err();
        assert!(matches!(err, Error::ProtocFailed(msg) if msg.is_empty()));
    }

    #[test]
    fn test_parse_empty_descriptor_set() {
        assert!(parse_file_descriptor_set(&[]).unwrap().file.is_empty());
    }
}
