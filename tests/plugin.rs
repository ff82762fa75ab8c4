//! End-to-end tests of the plugin protocol: encoded request in, encoded
//! response out.

mod common;

use common::*;
use proptest::prelude::*;
use proptest::property_test;
use protoc_gen_ts::descriptor::{decode_code_generator_request, Label, Type};
use protoc_gen_ts::wire::{encode_bytes, encode_key, encode_varint, WireType};
use protoc_gen_ts::{run_plugin, Error};

fn run(request: &protoc_gen_ts::descriptor::CodeGeneratorRequest) -> Vec<(String, String)> {
    let output = run_plugin(&encode_request(request)).expect("plugin failed");
    decode_response(&output).expect("response carried an error")
}

#[test]
fn test_simple_message() {
    let hello = message(
        "Hello",
        vec![
            field("name", 1, Label::Optional, Type::String),
            field("count", 2, Label::Optional, Type::Int32),
        ],
    );
    let request = request(vec![proto3_file("greet.proto", "greet", vec![hello])], &["greet.proto"], "");

    let files = run(&request);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "greet_pb.ts");
    insta::assert_snapshot!(files[0].1.trim_end(), @r#"
    // Generated by the protocol buffer compiler.  DO NOT EDIT!
    // Source: greet.proto

    import * as __pb__ from 'protobuf'


    export class Hello implements __pb__.Message {
      name: string;
      count: number;

      constructor() {
        this.name = "";
        this.count = 0;
      }

      MergeFrom(d: __pb__.Internal.Decoder): void {
        while (!d.isEOF()) {
          let [fn, wt] = d.readTag();
          switch(fn) {
            case 1:
            this.name = d.readString();
            break;
            case 2:
            this.count = d.readVarInt32();
            break;
            default:
            d.skipWireType(wt)
          }
        }
      }

      WriteTo(e: __pb__.Internal.Encoder): void {
        if (this.name != "") {
          e.writeTag(1, 2);
          e.writeString(this.name);
        }
        if (this.count != 0) {
          e.writeTag(2, 0);
          e.writeNumberAsVarint(this.count);
        }
      }
    }
    "#);
}

#[test]
fn test_cross_file_import() {
    let money = message("Money", vec![field("cents", 1, Label::Optional, Type::Sint64)]);
    let types = proto3_file("common/types.proto", "common", vec![money]);

    let order = message(
        "Order",
        vec![typed_field("price", 1, Label::Optional, Type::Message, ".common.Money")],
    );
    let mut shop = proto3_file("shop/order.proto", "shop", vec![order]);
    shop.dependency.push("common/types.proto".to_string());

    let request = request(vec![types, shop], &["shop/order.proto"], "");
    let files = run(&request);

    // Only requested files are generated.
    assert_eq!(files.len(), 1);
    let (name, content) = &files[0];
    assert_eq!(name, "shop/order_pb.ts");
    assert!(content.contains(
        "import * as __pb__ from 'protobuf'\n\
         import * as ______common_types_pb from './../common/types_pb'\n\n\n"
    ));
    assert!(content.contains("  price: ______common_types_pb.Money | null;\n"));
    // The dependency's 64-bit field does not pull `long` into this file.
    assert!(!content.contains("__long"));
}

#[test]
fn test_distinct_imports_for_similar_file_names() {
    let dashed = proto3_file("a-b.proto", "x", vec![message("A", vec![])]);
    let underscored = proto3_file("a_b.proto", "y", vec![message("B", vec![])]);
    let main = proto3_file(
        "main.proto",
        "m",
        vec![message(
            "Main",
            vec![
                typed_field("b", 1, Label::Optional, Type::Message, ".y.B"),
                typed_field("a", 2, Label::Optional, Type::Message, ".x.A"),
            ],
        )],
    );
    let request = request(vec![dashed, underscored, main], &["main.proto"], "");

    let content = &run(&request)[0].1;
    assert!(content.contains(
        "import * as ___a_b_pb_2 from './a-b_pb'\n\
         import * as ___a_b_pb from './a_b_pb'\n"
    ));
    assert!(content.contains("  b: ___a_b_pb.B | null;\n"));
    assert!(content.contains("  a: ___a_b_pb_2.A | null;\n"));
}

#[test]
fn test_map_field() {
    let mut item = message(
        "Item",
        vec![typed_field("labels", 1, Label::Repeated, Type::Message, ".inv.Item.LabelsEntry")],
    );
    item.nested_type.push(map_entry(
        "LabelsEntry",
        Type::String,
        field("value", 2, Label::Optional, Type::Int64),
    ));
    let request = request(vec![proto3_file("inv.proto", "inv", vec![item])], &["inv.proto"], "");

    let files = run(&request);
    let content = &files[0].1;
    assert!(content.contains("  labels: Map<string, __long>;\n"));
    assert!(content.contains("    this.labels = new Map<string, __long>();\n"));
    assert!(content.contains("          this.labels.set(obj.key, obj.value);\n"));
    assert!(content.contains("      let obj = new Item.LabelsEntry();\n"));
    assert!(content.contains("export namespace Item {\n  export class LabelsEntry implements __pb__.Message {\n"));
    assert!(content.contains("import * as __long from 'long'\n"));
}

#[test]
fn test_oneof_field() {
    let mut text = field("text", 1, Label::Optional, Type::String);
    text.oneof_index = Some(0);
    let mut flag = field("flag", 2, Label::Optional, Type::Bool);
    flag.oneof_index = Some(0);
    let mut value = message("Value", vec![text, flag]);
    value.oneof_decl.push(oneof("kind"));
    let request = request(vec![proto3_file("v.proto", "", vec![value])], &["v.proto"], "");

    let files = run(&request);
    let content = &files[0].1;
    assert!(content.contains("  kind: Value.kind.oneof_type;\n"));
    assert!(content.contains("    this.kind = __pb__.OneofNotSet.singleton;\n"));
    assert!(content.contains("        this.kind = new Value.kind.text(d.readString());\n"));
    assert!(content.contains("    Value.kind.WriteTo(this.kind, e);\n"));
    assert!(content.contains("export namespace Value.kind {\n"));
    assert!(content.contains("  export type oneof_type = __pb__.OneofNotSet | text | flag;\n"));
}

#[test]
fn test_enums_and_grpc() {
    let mut file = proto3_file("api.proto", "api", vec![message("Ping", vec![])]);
    file.enum_type.push(enumeration("Status", &[("UNKNOWN", 0), ("OK", 1)]));
    file.service.push(service("Probe", vec![method("Check", ".api.Ping", ".api.Ping")]));
    let request = request(vec![file], &["api.proto"], "plugin=grpc,library_import=../runtime");

    let files = run(&request);
    let content = &files[0].1;
    assert!(content.contains("import * as __pb__ from '../runtime'\n"));
    assert!(content.contains("export const enum Status {\n  UNKNOWN = 0,\n  OK = 1,\n}\n"));
    // Enums are emitted before messages.
    assert!(content.find("const enum Status").unwrap() < content.find("class Ping").unwrap());
    assert!(content.contains("  async Check(min: Ping, ...co: __pb__.Grpc.CallOption[]): Promise<Ping> {\n"));
    assert!(content.contains("    await this.cc.Invoke('/api.Probe/Check', min, mout, ...co);\n"));
}

#[test]
fn test_unknown_option() {
    let request = request(vec![proto3_file("a.proto", "", vec![])], &["a.proto"], "plugin=grpc,es6");
    let err = run_plugin(&encode_request(&request)).unwrap_err();
    assert_eq!(err.to_string(), "unknown compiler option: es6");
}

#[test]
fn test_proto2_rejected() {
    let mut file = proto3_file("legacy.proto", "old", vec![]);
    file.syntax = Some("proto2".to_string());
    let request = request(vec![file], &["legacy.proto"], "");
    let err = run_plugin(&encode_request(&request)).unwrap_err();
    assert!(matches!(&err, Error::UnsupportedSyntax { file, .. } if file == "legacy.proto"));
}

#[test]
fn test_unresolved_type() {
    let msg = message(
        "A",
        vec![typed_field("b", 1, Label::Optional, Type::Message, ".other.B")],
    );
    let request = request(vec![proto3_file("a.proto", "pkg", vec![msg])], &["a.proto"], "");
    let err = run_plugin(&encode_request(&request)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to resolve type .other.B referenced from a.proto"
    );
}

#[test]
fn test_truncated_request() {
    let request = request(vec![proto3_file("a.proto", "", vec![])], &["a.proto"], "");
    let bytes = encode_request(&request);
    let err = run_plugin(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn test_empty_request() {
    assert!(run_plugin(&[]).unwrap().is_empty());
}

#[property_test]
fn proptest_unknown_fields_are_skipped(number: u32, value: u64, blob: Vec<u8>) {
    // Stay clear of the numbers the request declares.
    let number = 16 + number % 1000;
    let request = request(vec![proto3_file("a.proto", "pkg", vec![])], &["a.proto"], "plugin=grpc");
    let mut bytes = encode_request(&request);
    encode_key(&mut bytes, number, WireType::Varint).unwrap();
    encode_varint(&mut bytes, value).unwrap();
    encode_bytes(&mut bytes, number + 1, &blob).unwrap();
    encode_key(&mut bytes, number, WireType::I64).unwrap();
    bytes.extend_from_slice(&value.to_le_bytes());
    encode_key(&mut bytes, number, WireType::I32).unwrap();
    bytes.extend_from_slice(&(value as u32).to_le_bytes());

    let decoded = decode_code_generator_request(&bytes).unwrap();
    prop_assert_eq!(decoded, request);
}
