//! Descriptor types for protobuf schemas and the protoc plugin protocol.
//!
//! These types mirror the parts of `google/protobuf/descriptor.proto` and
//! `google/protobuf/compiler/plugin.proto` that the generator reads. They are
//! implemented independently to avoid depending on a full protobuf runtime.

mod decode;
mod encode;

pub use decode::{decode_code_generator_request, decode_file_descriptor_set};
pub use encode::encode_code_generator_response;

/// A collection of file descriptors.
/// Corresponds to google.protobuf.FileDescriptorSet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDescriptorSet {
    /// The file descriptors.
    pub file: Vec<FileDescriptorProto>, // field 1
}

/// Describes a complete .proto file.
/// Corresponds to google.protobuf.FileDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDescriptorProto {
    /// The file name, relative to root of source tree.
    pub name: Option<String>, // field 1
    /// The package name.
    pub package: Option<String>, // field 2
    /// Names of files imported by this file.
    pub dependency: Vec<String>, // field 3
    /// All top-level message definitions in this file.
    pub message_type: Vec<DescriptorProto>, // field 4
    /// All top-level enum definitions in this file.
    pub enum_type: Vec<EnumDescriptorProto>, // field 5
    /// All service definitions in this file.
    pub service: Vec<ServiceDescriptorProto>, // field 6
    /// The syntax of the proto file (e.g., "proto2", "proto3").
    pub syntax: Option<String>, // field 12
}

impl FileDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }

    /// protoc omits the syntax field for proto2 files.
    pub fn syntax(&self) -> &str {
        self.syntax.as_deref().unwrap_or("")
    }
}

/// Describes a message type.
/// Corresponds to google.protobuf.DescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorProto {
    /// The message name.
    pub name: Option<String>, // field 1
    /// Fields of the message.
    pub field: Vec<FieldDescriptorProto>, // field 2
    /// Nested message types.
    pub nested_type: Vec<DescriptorProto>, // field 3
    /// Nested enum types.
    pub enum_type: Vec<EnumDescriptorProto>, // field 4
    /// Message options.
    pub options: Option<MessageOptions>, // field 7
    /// Oneof declarations.
    pub oneof_decl: Vec<OneofDescriptorProto>, // field 8
}

impl DescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Whether protoc synthesized this message for a `map<K, V>` field.
    pub fn is_map_entry(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false)
    }
}

/// Describes a field within a message.
/// Corresponds to google.protobuf.FieldDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescriptorProto {
    /// The field name.
    pub name: Option<String>, // field 1
    /// The field number (tag).
    pub number: Option<i32>, // field 3
    /// The field label (optional, required, repeated).
    pub label: Option<i32>, // field 4
    /// The field type.
    pub r#type: Option<i32>, // field 5
    /// For message and enum types, the fully-qualified type name.
    pub type_name: Option<String>, // field 6
    /// If set, this field is part of a oneof.
    pub oneof_index: Option<i32>, // field 9
}

impl FieldDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn number(&self) -> i32 {
        self.number.unwrap_or(0)
    }

    /// Get the field label.
    pub fn label(&self) -> Label {
        self.label
            .and_then(Label::from_i32)
            .unwrap_or(Label::Optional)
    }

    /// Get the field type.
    pub fn field_type(&self) -> Option<Type> {
        self.r#type.and_then(Type::from_i32)
    }
}

/// Describes an enum type.
/// Corresponds to google.protobuf.EnumDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumDescriptorProto {
    /// The enum name.
    pub name: Option<String>, // field 1
    /// The enum values.
    pub value: Vec<EnumValueDescriptorProto>, // field 2
}

impl EnumDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Describes an enum value.
/// Corresponds to google.protobuf.EnumValueDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumValueDescriptorProto {
    /// The value name.
    pub name: Option<String>, // field 1
    /// The value number.
    pub number: Option<i32>, // field 2
}

/// Describes a oneof.
/// Corresponds to google.protobuf.OneofDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneofDescriptorProto {
    /// The oneof name.
    pub name: Option<String>, // field 1
}

/// Options for a message type.
/// Corresponds to google.protobuf.MessageOptions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    /// Set true if this message is a map entry type.
    pub map_entry: Option<bool>, // field 7
}

/// Describes a service.
/// Corresponds to google.protobuf.ServiceDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceDescriptorProto {
    /// The service name.
    pub name: Option<String>, // field 1
    /// The RPC methods.
    pub method: Vec<MethodDescriptorProto>, // field 2
}

impl ServiceDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Describes a method of a service.
/// Corresponds to google.protobuf.MethodDescriptorProto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDescriptorProto {
    /// The method name.
    pub name: Option<String>, // field 1
    /// Fully-qualified input type name.
    pub input_type: Option<String>, // field 2
    /// Fully-qualified output type name.
    pub output_type: Option<String>, // field 3
    /// Identifies if the client streams multiple messages.
    pub client_streaming: Option<bool>, // field 5
    /// Identifies if the server streams multiple messages.
    pub server_streaming: Option<bool>, // field 6
}

impl MethodDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_streaming(&self) -> bool {
        self.client_streaming.unwrap_or(false) || self.server_streaming.unwrap_or(false)
    }
}

/// The version number of protocol compiler.
/// Corresponds to google.protobuf.compiler.Version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Version {
    pub major: Option<i32>,     // field 1
    pub minor: Option<i32>,     // field 2
    pub patch: Option<i32>,     // field 3
    pub suffix: Option<String>, // field 4
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}{}",
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
            self.suffix.as_deref().unwrap_or("")
        )
    }
}

/// An encoded request written to the plugin's stdin.
/// Corresponds to google.protobuf.compiler.CodeGeneratorRequest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeGeneratorRequest {
    /// The .proto files that were explicitly listed on the command-line.
    pub file_to_generate: Vec<String>, // field 1
    /// The generator parameter passed on the command-line.
    pub parameter: Option<String>, // field 2
    /// The version number of protocol compiler.
    pub compiler_version: Option<Version>, // field 3
    /// All files in `file_to_generate` and everything they import, in
    /// topological order.
    pub proto_file: Vec<FileDescriptorProto>, // field 15
}

/// The plugin writes an encoded response to stdout.
/// Corresponds to google.protobuf.compiler.CodeGeneratorResponse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeGeneratorResponse {
    /// Error message reported back to protoc.
    pub error: Option<String>, // field 1
    /// Generated files.
    pub file: Vec<GeneratedFile>, // field 15
}

/// A single generated file.
/// Corresponds to google.protobuf.compiler.CodeGeneratorResponse.File.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedFile {
    /// The file name, relative to the output directory.
    pub name: String, // field 1
    /// The file contents.
    pub content: String, // field 15
}

/// Field type enumeration.
/// Corresponds to google.protobuf.FieldDescriptorProto.Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Type {
    Double = 1,
    Float = 2,
    Int64 = 3,
    Uint64 = 4,
    Int32 = 5,
    Fixed64 = 6,
    Fixed32 = 7,
    Bool = 8,
    String = 9,
    Group = 10,
    Message = 11,
    Bytes = 12,
    Uint32 = 13,
    Enum = 14,
    Sfixed32 = 15,
    Sfixed64 = 16,
    Sint32 = 17,
    Sint64 = 18,
}

impl Type {
    /// Convert from i32.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Double),
            2 => Some(Self::Float),
            3 => Some(Self::Int64),
            4 => Some(Self::Uint64),
            5 => Some(Self::Int32),
            6 => Some(Self::Fixed64),
            7 => Some(Self::Fixed32),
            8 => Some(Self::Bool),
            9 => Some(Self::String),
            10 => Some(Self::Group),
            11 => Some(Self::Message),
            12 => Some(Self::Bytes),
            13 => Some(Self::Uint32),
            14 => Some(Self::Enum),
            15 => Some(Self::Sfixed32),
            16 => Some(Self::Sfixed64),
            17 => Some(Self::Sint32),
            18 => Some(Self::Sint64),
            _ => None,
        }
    }
}

/// Field label enumeration.
/// Corresponds to google.protobuf.FieldDescriptorProto.Label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Label {
    Optional = 1,
    Required = 2,
    Repeated = 3,
}

impl Label {
    /// Convert from i32.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Optional),
            2 => Some(Self::Required),
            3 => Some(Self::Repeated),
            _ => None,
        }
    }
}
