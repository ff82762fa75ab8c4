//! Helpers shared by the integration tests: descriptor builders and an
//! encoder producing the bytes protoc would send to the plugin.

#![allow(dead_code)]

use protoc_gen_ts::descriptor::{
    CodeGeneratorRequest, DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto,
    FieldDescriptorProto, FileDescriptorProto, Label, MessageOptions, MethodDescriptorProto,
    OneofDescriptorProto, ServiceDescriptorProto, Type,
};
use protoc_gen_ts::wire::{encode_bytes, encode_key, encode_varint, WireType};

pub fn field(name: &str, number: i32, label: Label, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(kind as i32),
        ..Default::default()
    }
}

pub fn typed_field(name: &str, number: i32, label: Label, kind: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, label, kind)
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

/// The entry message protoc synthesizes for a `map<K, V>` field.
pub fn map_entry(name: &str, key: Type, value: FieldDescriptorProto) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: vec![field("key", 1, Label::Optional, key), value],
        options: Some(MessageOptions { map_entry: Some(true) }),
        ..Default::default()
    }
}

pub fn oneof(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto {
        name: Some(name.to_string()),
    }
}

pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(name, number)| EnumValueDescriptorProto {
                name: Some(name.to_string()),
                number: Some(*number),
            })
            .collect(),
    }
}

pub fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        ..Default::default()
    }
}

pub fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
    }
}

pub fn proto3_file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        message_type: messages,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub fn request(files: Vec<FileDescriptorProto>, to_generate: &[&str], parameter: &str) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: to_generate.iter().map(|s| s.to_string()).collect(),
        parameter: (!parameter.is_empty()).then(|| parameter.to_string()),
        compiler_version: None,
        proto_file: files,
    }
}

/// Encode `request` the way protoc writes it to the plugin's stdin.
pub fn encode_request(request: &CodeGeneratorRequest) -> Vec<u8> {
    let mut out = Vec::new();
    for name in &request.file_to_generate {
        encode_bytes(&mut out, 1, name.as_bytes()).unwrap();
    }
    if let Some(parameter) = &request.parameter {
        encode_bytes(&mut out, 2, parameter.as_bytes()).unwrap();
    }
    for file in &request.proto_file {
        encode_bytes(&mut out, 15, &encode_file(file)).unwrap();
    }
    out
}

/// Encode a FileDescriptorSet holding `files`.
pub fn encode_descriptor_set(files: &[FileDescriptorProto]) -> Vec<u8> {
    let mut out = Vec::new();
    for file in files {
        encode_bytes(&mut out, 1, &encode_file(file)).unwrap();
    }
    out
}

fn encode_string(out: &mut Vec<u8>, number: u32, value: &Option<String>) {
    if let Some(value) = value {
        encode_bytes(out, number, value.as_bytes()).unwrap();
    }
}

fn encode_int(out: &mut Vec<u8>, number: u32, value: Option<i32>) {
    if let Some(value) = value {
        encode_key(out, number, WireType::Varint).unwrap();
        // Negative int32 values are sign-extended to 64 bits.
        encode_varint(out, value as i64 as u64).unwrap();
    }
}

fn encode_bool(out: &mut Vec<u8>, number: u32, value: Option<bool>) {
    if let Some(value) = value {
        encode_key(out, number, WireType::Varint).unwrap();
        encode_varint(out, u64::from(value)).unwrap();
    }
}

fn encode_file(file: &FileDescriptorProto) -> Vec<u8> {
    let mut out = Vec::new();
    encode_string(&mut out, 1, &file.name);
    encode_string(&mut out, 2, &file.package);
    for dependency in &file.dependency {
        encode_bytes(&mut out, 3, dependency.as_bytes()).unwrap();
    }
    for message in &file.message_type {
        encode_bytes(&mut out, 4, &encode_message(message)).unwrap();
    }
    for enum_type in &file.enum_type {
        encode_bytes(&mut out, 5, &encode_enum(enum_type)).unwrap();
    }
    for service in &file.service {
        encode_bytes(&mut out, 6, &encode_service(service)).unwrap();
    }
    encode_string(&mut out, 12, &file.syntax);
    out
}

fn encode_message(message: &DescriptorProto) -> Vec<u8> {
    let mut out = Vec::new();
    encode_string(&mut out, 1, &message.name);
    for field in &message.field {
        encode_bytes(&mut out, 2, &encode_field(field)).unwrap();
    }
    for nested in &message.nested_type {
        encode_bytes(&mut out, 3, &encode_message(nested)).unwrap();
    }
    for enum_type in &message.enum_type {
        encode_bytes(&mut out, 4, &encode_enum(enum_type)).unwrap();
    }
    if let Some(options) = &message.options {
        let mut nested = Vec::new();
        encode_bool(&mut nested, 7, options.map_entry);
        encode_bytes(&mut out, 7, &nested).unwrap();
    }
    for decl in &message.oneof_decl {
        let mut nested = Vec::new();
        encode_string(&mut nested, 1, &decl.name);
        encode_bytes(&mut out, 8, &nested).unwrap();
    }
    out
}

fn encode_field(field: &FieldDescriptorProto) -> Vec<u8> {
    let mut out = Vec::new();
    encode_string(&mut out, 1, &field.name);
    encode_int(&mut out, 3, field.number);
    encode_int(&mut out, 4, field.label);
    encode_int(&mut out, 5, field.r#type);
    encode_string(&mut out, 6, &field.type_name);
    encode_int(&mut out, 9, field.oneof_index);
    out
}

fn encode_enum(enum_type: &EnumDescriptorProto) -> Vec<u8> {
    let mut out = Vec::new();
    encode_string(&mut out, 1, &enum_type.name);
    for value in &enum_type.value {
        let mut nested = Vec::new();
        encode_string(&mut nested, 1, &value.name);
        encode_int(&mut nested, 2, value.number);
        encode_bytes(&mut out, 2, &nested).unwrap();
    }
    out
}

fn encode_service(service: &ServiceDescriptorProto) -> Vec<u8> {
    let mut out = Vec::new();
    encode_string(&mut out, 1, &service.name);
    for method in &service.method {
        let mut nested = Vec::new();
        encode_string(&mut nested, 1, &method.name);
        encode_string(&mut nested, 2, &method.input_type);
        encode_string(&mut nested, 3, &method.output_type);
        encode_bool(&mut nested, 5, method.client_streaming);
        encode_bool(&mut nested, 6, method.server_streaming);
        encode_bytes(&mut out, 2, &nested).unwrap();
    }
    out
}

/// Decode a response into `(name, content)` pairs, or the error string.
pub fn decode_response(bytes: &[u8]) -> Result<Vec<(String, String)>, String> {
    use protoc_gen_ts::wire::{decode_bytes, decode_key, decode_string, skip_field};

    let mut buf = bytes;
    let mut files = Vec::new();
    while !buf.is_empty() {
        let (number, wire_type) = decode_key(&mut buf).unwrap();
        match number {
            1 => return Err(decode_string(&mut buf).unwrap()),
            15 => {
                let mut nested = decode_bytes(&mut buf).unwrap();
                let (mut name, mut content) = (String::new(), String::new());
                while !nested.is_empty() {
                    let (number, wire_type) = decode_key(&mut nested).unwrap();
                    match number {
                        1 => name = decode_string(&mut nested).unwrap(),
                        15 => content = decode_string(&mut nested).unwrap(),
                        _ => skip_field(&mut nested, wire_type).unwrap(),
                    }
                }
                files.push((name, content));
            }
            _ => skip_field(&mut buf, wire_type).unwrap(),
        }
    }
    Ok(files)
}
