//! `protoc-gen-ts` compiles proto3 schemas into TypeScript.
//!
//! Every message becomes a class with typed, default-initialized properties,
//! a `MergeFrom` method decoding the binary wire format and a `WriteTo` method
//! encoding it. Enums become `const enum`s, oneofs become tagged unions and
//! services can optionally get gRPC client stubs. Generated code depends on a
//! small runtime (imported as `__pb__`) and on `long` for 64-bit integers.
//!
//! # As a protoc plugin
//!
//! ```sh
//! protoc --plugin=protoc-gen-ts --ts_out=gen --ts_opt=plugin=grpc api.proto
//! ```
//!
//! Recognized options are `plugin=grpc` and `library_import=<module>`.
//!
//! # From Rust
//!
//! ```rust,no_run
//! fn main() -> Result<(), protoc_gen_ts::Error> {
//!     protoc_gen_ts::Config::new()
//!         .out_dir("web/src/gen")
//!         .grpc(true)
//!         .compile_protos(&["proto/api.proto"], &["proto/"])?;
//!     Ok(())
//! }
//! ```

mod codegen;
mod config;
pub mod descriptor;
mod error;
mod namespace;
mod protoc;
pub mod wire;

pub use config::{Config, Options};
pub use error::{Error, Result};

use std::path::Path;

use tracing::debug;

use descriptor::{CodeGeneratorRequest, CodeGeneratorResponse};

/// Generate TypeScript for every file a plugin request asks for.
///
/// Fails without partial output if any requested file cannot be generated.
pub fn generate(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    codegen::generate(request)
}

/// Run the plugin over an encoded `CodeGeneratorRequest`, returning the
/// encoded `CodeGeneratorResponse`.
pub fn run_plugin(input: &[u8]) -> Result<Vec<u8>> {
    let request = descriptor::decode_code_generator_request(input)?;
    debug!(
        files = request.file_to_generate.len(),
        parameter = request.parameter.as_deref().unwrap_or_default(),
        "decoded request"
    );
    let response = generate(&request)?;
    descriptor::encode_code_generator_response(&response)
}

/// Compile `.proto` files into TypeScript with default settings, writing
/// to `$OUT_DIR`.
///
/// # Arguments
/// * `protos` - Paths to `.proto` files to compile
/// * `includes` - Include paths for resolving imports
pub fn compile_protos(protos: &[impl AsRef<Path>], includes: &[impl AsRef<Path>]) -> Result<()> {
    Config::new().compile_protos(protos, includes)
}
