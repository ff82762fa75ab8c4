//! Encoder for the plugin response.

use super::{CodeGeneratorResponse, GeneratedFile};
use crate::wire::encode_bytes;
use crate::Error;

/// Encode a CodeGeneratorResponse into protobuf binary data.
pub fn encode_code_generator_response(resp: &CodeGeneratorResponse) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();

    if let Some(error) = &resp.error {
        encode_bytes(&mut out, 1, error.as_bytes())?;
    }
    for file in &resp.file {
        let nested = encode_generated_file(file)?;
        encode_bytes(&mut out, 15, &nested)?;
    }

    Ok(out)
}

fn encode_generated_file(file: &GeneratedFile) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(file.name.len() + file.content.len() + 8);
    encode_bytes(&mut out, 1, file.name.as_bytes())?;
    encode_bytes(&mut out, 15, file.content.as_bytes())?;
    Ok(out)
}
