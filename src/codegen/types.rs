//! Mapping from protobuf field types to TypeScript types and runtime calls.

use crate::descriptor::Type;
use crate::wire::WireType;

/// How one scalar kind is represented and coded by the TypeScript runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    /// TypeScript value type. `None` for enums, which use their resolved name.
    pub ts_type: Option<&'static str>,
    /// Literal the generated constructor assigns.
    pub default: &'static str,
    pub wire_type: WireType,
    /// Whether repeated values may use the packed encoding.
    pub packable: bool,
    /// `Internal.Decoder` method reading one value.
    pub reader: &'static str,
    /// `Internal.Encoder` method writing one value.
    pub writer: &'static str,
}

const fn scalar(
    ts_type: &'static str,
    default: &'static str,
    wire_type: WireType,
    reader: &'static str,
    writer: &'static str,
) -> Scalar {
    Scalar {
        ts_type: Some(ts_type),
        default,
        wire_type,
        packable: !matches!(wire_type, WireType::Len),
        reader,
        writer,
    }
}

/// Look up the scalar representation of `kind`.
///
/// Returns `None` for message and group kinds, which have no primitive
/// reader or writer.
pub fn lookup(kind: Type) -> Option<Scalar> {
    let scalar = match kind {
        Type::String => scalar("string", "\"\"", WireType::Len, "readString", "writeString"),
        Type::Bytes => scalar(
            "Uint8Array",
            "new Uint8Array(0)",
            WireType::Len,
            "readBytes",
            "writeBytes",
        ),
        Type::Int64 => scalar(
            "__long",
            "__long.ZERO",
            WireType::Varint,
            "readVarintSigned",
            "writeVarint",
        ),
        Type::Uint64 => scalar(
            "__long",
            "__long.UZERO",
            WireType::Varint,
            "readVarint",
            "writeVarint",
        ),
        Type::Int32 => scalar(
            "number",
            "0",
            WireType::Varint,
            "readVarInt32",
            "writeNumberAsVarint",
        ),
        Type::Uint32 => scalar(
            "number",
            "0",
            WireType::Varint,
            "readVarUint32",
            "writeNumberAsVarint",
        ),
        Type::Sint64 => scalar(
            "__long",
            "__long.ZERO",
            WireType::Varint,
            "readZigZag64",
            "writeZigZag64",
        ),
        Type::Sint32 => scalar("number", "0", WireType::Varint, "readZigZag32", "writeZigZag32"),
        Type::Float => scalar("number", "0.0", WireType::I32, "readFloat", "writeFloat"),
        Type::Double => scalar("number", "0.0", WireType::I64, "readDouble", "writeDouble"),
        Type::Fixed32 => scalar("number", "0", WireType::I32, "readUint32", "writeUint32"),
        Type::Sfixed32 => scalar("number", "0", WireType::I32, "readInt32", "writeInt32"),
        Type::Fixed64 => scalar(
            "__long",
            "__long.UZERO",
            WireType::I64,
            "readUint64",
            "writeUint64",
        ),
        Type::Sfixed64 => scalar(
            "__long",
            "__long.ZERO",
            WireType::I64,
            "readInt64",
            "writeInt64",
        ),
        Type::Bool => scalar("boolean", "false", WireType::Varint, "readBool", "writeBool"),
        Type::Enum => Scalar {
            ts_type: None,
            default: "0",
            wire_type: WireType::Varint,
            packable: true,
            reader: "readVarintSignedAsNumber",
            writer: "writeNumberAsVarint",
        },
        Type::Message | Type::Group => return None,
    };
    Some(scalar)
}

/// Wire type used when writing a value of `kind`.
pub fn wire_type(kind: Type) -> WireType {
    lookup(kind).map_or(WireType::Len, |s| s.wire_type)
}

/// Whether values of `kind` are represented by the `long` module.
pub fn is_long(kind: Type) -> bool {
    matches!(
        kind,
        Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64
    )
}
