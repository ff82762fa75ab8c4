//! Per-field TypeScript generation.
//!
//! A [`Field`] wraps one field descriptor together with its resolved type and
//! emits the statements that decode it inside `MergeFrom` and encode it inside
//! `WriteTo`.

use std::fmt::Write;

use super::printer::Printer;
use super::types::{self, Scalar};
use super::{FileContext, RUNTIME_ALIAS};
use crate::descriptor::{DescriptorProto, FieldDescriptorProto, Label, Type};
use crate::Error;

/// Where a oneof member stores its value on the owning message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofSlot {
    /// Property on the message, i.e. the oneof's name.
    pub property: String,
    /// Namespace holding the variant classes, e.g. `Outer.kind`.
    pub namespace: String,
}

/// The synthesized key/value pair behind a `map<K, V>` field.
#[derive(Debug)]
struct MapEntry<'a> {
    key: Field<'a>,
    value: Field<'a>,
}

impl<'a> MapEntry<'a> {
    fn new(entry: &'a DescriptorProto, ctx: &mut FileContext<'a, '_>) -> Result<Self, Error> {
        let [key, value] = entry.field.as_slice() else {
            return Err(Error::MalformedMapEntry(entry.name().to_string()));
        };
        Ok(Self {
            key: Field::new(key, ctx)?,
            value: Field::new(value, ctx)?,
        })
    }
}

/// A field of a message being generated.
#[derive(Debug)]
pub struct Field<'a> {
    descriptor: &'a FieldDescriptorProto,
    kind: Type,
    /// TypeScript type of one value, without repetition or nullability.
    ts_type: String,
    map: Option<Box<MapEntry<'a>>>,
    oneof: Option<OneofSlot>,
}

impl<'a> Field<'a> {
    /// Wrap `descriptor`, resolving any message or enum type it references.
    pub fn new(descriptor: &'a FieldDescriptorProto, ctx: &mut FileContext<'a, '_>) -> Result<Self, Error> {
        let kind = descriptor
            .field_type()
            .ok_or_else(|| Error::InvalidFieldType {
                field: descriptor.name().to_string(),
                value: descriptor.r#type.unwrap_or_default(),
            })?;
        if types::is_long(kind) {
            ctx.uses_long = true;
        }

        let mut map = None;
        let ts_type = match types::lookup(kind).and_then(|scalar| scalar.ts_type) {
            Some(ts_type) => ts_type.to_string(),
            None => {
                let type_name = descriptor
                    .type_name
                    .as_deref()
                    .ok_or(Error::MissingName("field type"))?;
                let (ts_name, resolved) = ctx.type_reference(type_name)?;
                if let Some(entry) = resolved.descriptor.as_message().filter(|m| m.is_map_entry()) {
                    map = Some(Box::new(MapEntry::new(entry, ctx)?));
                }
                ts_name
            }
        };

        Ok(Self {
            descriptor,
            kind,
            ts_type,
            map,
            oneof: None,
        })
    }

    pub fn name(&self) -> &'a str {
        self.descriptor.name()
    }

    pub fn number(&self) -> i32 {
        self.descriptor.number()
    }

    pub fn is_repeated(&self) -> bool {
        self.descriptor.label() == Label::Repeated
    }

    pub fn is_message(&self) -> bool {
        matches!(self.kind, Type::Message | Type::Group)
    }

    pub fn is_map(&self) -> bool {
        self.map.is_some()
    }

    /// Index into the owning message's oneof declarations, if this field is a
    /// oneof member.
    pub fn oneof_index(&self) -> Option<i32> {
        self.descriptor.oneof_index
    }

    pub fn is_oneof_member(&self) -> bool {
        self.descriptor.oneof_index.is_some()
    }

    pub fn set_oneof(&mut self, slot: OneofSlot) {
        self.oneof = Some(slot);
    }

    /// The property type, accounting for maps, repetition and nullability.
    pub fn labeled_type(&self) -> String {
        if let Some(map) = &self.map {
            format!("Map<{}, {}>", map.key.ts_type, map.value.ts_type)
        } else if self.is_repeated() {
            format!("{}[]", self.ts_type)
        } else if self.is_message() {
            format!("{} | null", self.ts_type)
        } else {
            self.ts_type.clone()
        }
    }

    /// The value a freshly constructed message holds for this field.
    pub fn default_value(&self) -> String {
        if self.is_map() {
            format!("new {}()", self.labeled_type())
        } else if self.is_repeated() {
            "[]".to_string()
        } else {
            types::lookup(self.kind)
                .map_or("null", |scalar| scalar.default)
                .to_string()
        }
    }

    fn scalar(&self) -> Result<Scalar, Error> {
        types::lookup(self.kind).ok_or_else(|| Error::InvalidFieldType {
            field: self.name().to_string(),
            value: self.kind as i32,
        })
    }

    /// Expression reading one value from the decoder `dec`.
    pub fn reader(&self, dec: &str) -> Result<String, Error> {
        Ok(format!("{}.{}()", dec, self.scalar()?.reader))
    }

    /// Expression writing `value` to the encoder `enc`.
    pub fn writer(&self, enc: &str, value: &str) -> Result<String, Error> {
        Ok(format!("{}.{}({})", enc, self.scalar()?.writer, value))
    }

    /// Expression writing this field's key to the encoder `enc`.
    pub fn tag_writer(&self, enc: &str) -> String {
        format!(
            "{}.writeTag({}, {})",
            enc,
            self.number(),
            types::wire_type(self.kind).into_val()
        )
    }

    /// Emit the body of this field's `case` in `MergeFrom`.
    ///
    /// `dec` names the decoder and `wt` the wire type read with the tag.
    pub fn write_decoder(&self, w: &mut Printer, dec: &str, wt: &str) -> Result<(), Error> {
        let name = self.name();

        if let Some(map) = &self.map {
            writeln!(w, "{{")?;
            writeln!(w, "let obj = new {}();", self.ts_type)?;
            writeln!(w, "obj.MergeFrom({}.readDecoder());", dec)?;
            if map.value.is_message() {
                writeln!(
                    w,
                    "this.{}.set(obj.key, obj.value == null ? new {}() : obj.value);",
                    name, map.value.ts_type
                )?;
            } else {
                writeln!(w, "this.{}.set(obj.key, obj.value);", name)?;
            }
            writeln!(w, "}}")?;
            return Ok(());
        }

        if self.is_message() {
            if self.is_repeated() {
                writeln!(w, "{{")?;
                writeln!(w, "let obj = new {}();", self.ts_type)?;
                writeln!(w, "obj.MergeFrom({}.readDecoder());", dec)?;
                writeln!(w, "this.{}.push(obj)", name)?;
                writeln!(w, "}}")?;
            } else if let Some(oneof) = &self.oneof {
                writeln!(w, "{{")?;
                writeln!(w, "let msg = new {}();", self.ts_type)?;
                writeln!(w, "msg.MergeFrom({}.readDecoder());", dec)?;
                writeln!(
                    w,
                    "this.{} = new {}.{}(msg);",
                    oneof.property, oneof.namespace, name
                )?;
                writeln!(w, "}}")?;
            } else {
                writeln!(
                    w,
                    "if (this.{} == null) this.{} = new {}();",
                    name, name, self.ts_type
                )?;
                writeln!(w, "this.{}.MergeFrom({}.readDecoder());", name, dec)?;
            }
            return Ok(());
        }

        let reader = self.reader(dec)?;
        if let Some(oneof) = &self.oneof {
            writeln!(
                w,
                "this.{} = new {}.{}({});",
                oneof.property, oneof.namespace, name, reader
            )?;
            return Ok(());
        }
        if !self.is_repeated() {
            writeln!(w, "this.{} = {};", name, reader)?;
            return Ok(());
        }

        let packable = self.scalar()?.packable;
        if packable {
            writeln!(w, "if ({} == {}) {{", wt, crate::wire::WireType::Len.into_val())?;
            writeln!(w, "let packed = {}.readDecoder();", dec)?;
            writeln!(w, "while (!packed.isEOF()) {{")?;
            writeln!(w, "this.{}.push({})", name, self.reader("packed")?)?;
            writeln!(w, "}}")?;
            writeln!(w, "}} else {{")?;
        }
        writeln!(w, "this.{}.push({})", name, reader)?;
        if packable {
            writeln!(w, "}}")?;
        }
        Ok(())
    }

    /// Emit the statements writing this field in `WriteTo`.
    ///
    /// Oneof members are written by their oneof's dispatcher instead.
    pub fn write_encoder(&self, w: &mut Printer, enc: &str) -> Result<(), Error> {
        let name = self.name();
        let number = self.number();

        if self.is_map() {
            writeln!(w, "for (const [k, v] of this.{}) {{", name)?;
            writeln!(w, "let obj = new {}();", self.ts_type)?;
            writeln!(w, "obj.key = k;")?;
            writeln!(w, "obj.value = v;")?;
            writeln!(w, "let nested = new {}.Internal.Encoder();", RUNTIME_ALIAS)?;
            writeln!(w, "obj.WriteTo(nested);")?;
            writeln!(w, "{}.writeEncoder(nested, {});", enc, number)?;
            writeln!(w, "}}")?;
            return Ok(());
        }

        if self.is_message() {
            writeln!(w, "{{")?;
            if self.is_repeated() {
                writeln!(w, "for (const msg of this.{}) {{", name)?;
            } else {
                writeln!(w, "const msg = this.{};", name)?;
            }
            writeln!(w, "if (msg != null) {{")?;
            writeln!(w, "let nested = new {}.Internal.Encoder();", RUNTIME_ALIAS)?;
            writeln!(w, "msg.WriteTo(nested);")?;
            writeln!(w, "{}.writeEncoder(nested, {})", enc, number)?;
            writeln!(w, "}}")?;
            if self.is_repeated() {
                writeln!(w, "}}")?;
            }
            writeln!(w, "}}")?;
            return Ok(());
        }

        let tag_writer = self.tag_writer(enc);

        if !self.is_repeated() {
            if self.kind == Type::Bytes {
                writeln!(w, "if (this.{}.length != 0) {{", name)?;
            } else {
                writeln!(w, "if (this.{} != {}) {{", name, self.default_value())?;
            }
            writeln!(w, "{};", tag_writer)?;
            writeln!(w, "{};", self.writer(enc, &format!("this.{}", name))?)?;
            writeln!(w, "}}")?;
            return Ok(());
        }

        if self.scalar()?.packable {
            writeln!(w, "{{")?;
            writeln!(
                w,
                "const packed = new {}.Internal.Encoder();",
                RUNTIME_ALIAS
            )?;
            writeln!(w, "for (let elem of this.{}) {{", name)?;
            writeln!(w, "{};", self.writer("packed", "elem")?)?;
            writeln!(w, "}}")?;
            writeln!(w, "{}.writeEncoder(packed, {});", enc, number)?;
            writeln!(w, "}}")?;
        } else {
            writeln!(w, "for (let elem of this.{}) {{", name)?;
            writeln!(w, "{};", tag_writer)?;
            writeln!(w, "{};", self.writer(enc, "elem")?)?;
            writeln!(w, "}}")?;
        }
        Ok(())
    }
}
