//! Wire format for Google's Protocol Buffers, aka [protobuf](https://protobuf.dev).
//!
//! Only what the plugin protocol needs: reading the request descriptors and
//! writing the response.

use bytes::Buf;

use crate::Error;

/// Maximum size for a single length-delimited payload (64MB).
const MAX_MESSAGE_SIZE: u64 = 64 * 1024 * 1024;

/// Denotes the type of a field in an encoded protobuf message.
///
/// Protobuf messages are a series of key-value pairs. When encoded each key-value pair
/// is turned into a record consisting of a field number, a [`WireType`], and a payload.
/// The [`WireType`] indicates how large the proceeding payload is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum WireType {
    /// Variable length integer.
    ///
    /// Used for: `int32`, `int64`, `uint32`, `uint64`, `sint32`, `sint64`, `bool`, `enum`.
    Varint = 0,
    /// 64-bit integer.
    ///
    /// Used for: `fixed64`, `sfixed64`, `double`.
    I64 = 1,
    /// Variable length field.
    ///
    /// Used for: `string`, `bytes`, `message`, packed `repeated` fields.
    Len = 2,
    /// Group start (deprecated).
    SGroup = 3,
    /// Group end (deprecated).
    EGroup = 4,
    /// 32-bit integer.
    ///
    /// Used for: `fixed32`, `sfixed32`, `float`.
    I32 = 5,
}

impl WireType {
    /// Return the raw value for this [`WireType`].
    #[inline(always)]
    pub const fn into_val(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::SGroup),
            4 => Ok(WireType::EGroup),
            5 => Ok(WireType::I32),
            other => Err(Error::InvalidWireType(other)),
        }
    }
}

/// Decodes the key (field number + wire type) of the next record.
pub fn decode_key(buf: &mut &[u8]) -> Result<(u32, WireType), Error> {
    let key = decode_varint(buf)?;
    let wire_type = WireType::try_from((key & 0x07) as u8)?;
    let field_number = (key >> 3) as u32;
    Ok((field_number, wire_type))
}

/// Decode a LEB128 varint, advancing the buffer.
pub fn decode_varint(buf: &mut &[u8]) -> Result<u64, Error> {
    leb128::read::unsigned(buf).map_err(|e| match e {
        leb128::read::Error::IoError(_) => Error::UnexpectedEof,
        leb128::read::Error::Overflow => Error::InvalidVarint,
    })
}

/// Split off the next length-delimited payload.
pub fn decode_bytes<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], Error> {
    let len = decode_varint(buf)?;
    if len > MAX_MESSAGE_SIZE {
        return Err(Error::Decode {
            message: "length-delimited field",
            reason: format!("size {len} exceeds maximum"),
        });
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(Error::UnexpectedEof);
    }
    let data: &'a [u8] = *buf;
    let (payload, rest) = data.split_at(len);
    *buf = rest;
    Ok(payload)
}

/// Decode a length-delimited UTF-8 string.
pub fn decode_string(buf: &mut &[u8]) -> Result<String, Error> {
    let payload = decode_bytes(buf)?;
    Ok(String::from_utf8(payload.to_vec())?)
}

/// Skip a field based on its wire type.
pub fn skip_field(buf: &mut &[u8], wire_type: WireType) -> Result<(), Error> {
    match wire_type {
        WireType::Varint => {
            decode_varint(buf)?;
        }
        WireType::I64 => skip_fixed(buf, 8)?,
        WireType::Len => {
            decode_bytes(buf)?;
        }
        WireType::I32 => skip_fixed(buf, 4)?,
        WireType::SGroup | WireType::EGroup => {
            return Err(Error::InvalidWireType(wire_type.into_val()));
        }
    }
    Ok(())
}

fn skip_fixed(buf: &mut &[u8], width: usize) -> Result<(), Error> {
    if buf.remaining() < width {
        return Err(Error::UnexpectedEof);
    }
    buf.advance(width);
    Ok(())
}

/// Append a varint to `out`.
pub fn encode_varint(out: &mut Vec<u8>, value: u64) -> Result<(), Error> {
    leb128::write::unsigned(out, value)?;
    Ok(())
}

/// Append a record key to `out`.
pub fn encode_key(out: &mut Vec<u8>, field_number: u32, wire_type: WireType) -> Result<(), Error> {
    encode_varint(out, (u64::from(field_number) << 3) | u64::from(wire_type.into_val()))
}

/// Append a length-delimited record to `out`.
pub fn encode_bytes(out: &mut Vec<u8>, field_number: u32, payload: &[u8]) -> Result<(), Error> {
    encode_key(out, field_number, WireType::Len)?;
    encode_varint(out, payload.len() as u64)?;
    out.extend_from_slice(payload);
    Ok(())
}
