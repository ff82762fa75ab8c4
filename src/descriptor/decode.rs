//! Decoder for plugin requests and descriptor sets from protobuf binary format.
//!
//! Unknown fields are skipped by wire type, so descriptors produced by newer
//! protoc versions decode without error.

use bytes::Buf;

use super::*;
use crate::wire::{decode_bytes, decode_key, decode_string, decode_varint, skip_field};
use crate::Error;

/// Decode a CodeGeneratorRequest from protobuf binary data.
pub fn decode_code_generator_request(data: &[u8]) -> Result<CodeGeneratorRequest, Error> {
    let mut buf = data;
    let mut req = CodeGeneratorRequest::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => req.file_to_generate.push(decode_string(&mut buf)?),
            2 => req.parameter = Some(decode_string(&mut buf)?),
            3 => req.compiler_version = Some(decode_version(decode_bytes(&mut buf)?)?),
            15 => req
                .proto_file
                .push(decode_file_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(req)
}

/// Decode a FileDescriptorSet from protobuf binary data.
pub fn decode_file_descriptor_set(data: &[u8]) -> Result<FileDescriptorSet, Error> {
    let mut buf = data;
    let mut fds = FileDescriptorSet::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fds
                .file
                .push(decode_file_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fds)
}

fn decode_version(data: &[u8]) -> Result<Version, Error> {
    let mut buf = data;
    let mut version = Version::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => version.major = Some(decode_varint(&mut buf)? as i32),
            2 => version.minor = Some(decode_varint(&mut buf)? as i32),
            3 => version.patch = Some(decode_varint(&mut buf)? as i32),
            4 => version.suffix = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(version)
}

/// Decode a FileDescriptorProto.
fn decode_file_descriptor_proto(data: &[u8]) -> Result<FileDescriptorProto, Error> {
    let mut buf = data;
    let mut fdp = FileDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fdp.name = Some(decode_string(&mut buf)?),
            2 => fdp.package = Some(decode_string(&mut buf)?),
            3 => fdp.dependency.push(decode_string(&mut buf)?),
            4 => fdp
                .message_type
                .push(decode_descriptor_proto(decode_bytes(&mut buf)?)?),
            5 => fdp
                .enum_type
                .push(decode_enum_descriptor_proto(decode_bytes(&mut buf)?)?),
            6 => fdp
                .service
                .push(decode_service_descriptor_proto(decode_bytes(&mut buf)?)?),
            12 => fdp.syntax = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fdp)
}

/// Decode a DescriptorProto (message type).
fn decode_descriptor_proto(data: &[u8]) -> Result<DescriptorProto, Error> {
    let mut buf = data;
    let mut dp = DescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => dp.name = Some(decode_string(&mut buf)?),
            2 => dp
                .field
                .push(decode_field_descriptor_proto(decode_bytes(&mut buf)?)?),
            3 => dp
                .nested_type
                .push(decode_descriptor_proto(decode_bytes(&mut buf)?)?),
            4 => dp
                .enum_type
                .push(decode_enum_descriptor_proto(decode_bytes(&mut buf)?)?),
            7 => dp.options = Some(decode_message_options(decode_bytes(&mut buf)?)?),
            8 => dp
                .oneof_decl
                .push(decode_oneof_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(dp)
}

/// Decode a FieldDescriptorProto.
fn decode_field_descriptor_proto(data: &[u8]) -> Result<FieldDescriptorProto, Error> {
    let mut buf = data;
    let mut fdp = FieldDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fdp.name = Some(decode_string(&mut buf)?),
            3 => fdp.number = Some(decode_varint(&mut buf)? as i32),
            4 => fdp.label = Some(decode_varint(&mut buf)? as i32),
            5 => fdp.r#type = Some(decode_varint(&mut buf)? as i32),
            6 => fdp.type_name = Some(decode_string(&mut buf)?),
            9 => fdp.oneof_index = Some(decode_varint(&mut buf)? as i32),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fdp)
}

/// Decode an EnumDescriptorProto.
fn decode_enum_descriptor_proto(data: &[u8]) -> Result<EnumDescriptorProto, Error> {
    let mut buf = data;
    let mut edp = EnumDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => edp.name = Some(decode_string(&mut buf)?),
            2 => edp
                .value
                .push(decode_enum_value_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(edp)
}

/// Decode an EnumValueDescriptorProto.
fn decode_enum_value_descriptor_proto(data: &[u8]) -> Result<EnumValueDescriptorProto, Error> {
    let mut buf = data;
    let mut evdp = EnumValueDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => evdp.name = Some(decode_string(&mut buf)?),
            // int32 values are sign-extended to ten bytes on the wire.
            2 => evdp.number = Some(decode_varint(&mut buf)? as i32),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(evdp)
}

/// Decode a OneofDescriptorProto.
fn decode_oneof_descriptor_proto(data: &[u8]) -> Result<OneofDescriptorProto, Error> {
    let mut buf = data;
    let mut odp = OneofDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => odp.name = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(odp)
}

/// Decode MessageOptions.
fn decode_message_options(data: &[u8]) -> Result<MessageOptions, Error> {
    let mut buf = data;
    let mut mo = MessageOptions::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            7 => mo.map_entry = Some(decode_varint(&mut buf)? != 0),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(mo)
}

/// Decode a ServiceDescriptorProto.
fn decode_service_descriptor_proto(data: &[u8]) -> Result<ServiceDescriptorProto, Error> {
    let mut buf = data;
    let mut sdp = ServiceDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => sdp.name = Some(decode_string(&mut buf)?),
            2 => sdp
                .method
                .push(decode_method_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(sdp)
}

/// Decode a MethodDescriptorProto.
fn decode_method_descriptor_proto(data: &[u8]) -> Result<MethodDescriptorProto, Error> {
    let mut buf = data;
    let mut mdp = MethodDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => mdp.name = Some(decode_string(&mut buf)?),
            2 => mdp.input_type = Some(decode_string(&mut buf)?),
            3 => mdp.output_type = Some(decode_string(&mut buf)?),
            5 => mdp.client_streaming = Some(decode_varint(&mut buf)? != 0),
            6 => mdp.server_streaming = Some(decode_varint(&mut buf)? != 0),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(mdp)
}
