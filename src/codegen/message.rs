//! Message generation.

use std::fmt::Write;

use tracing::trace;

use super::enumeration::write_enum;
use super::field::Field;
use super::oneof::{write_oneof, Oneof};
use super::printer::Printer;
use super::{FileContext, RUNTIME_ALIAS};
use crate::descriptor::DescriptorProto;
use crate::Error;

/// Emit the class for `message`, followed by its oneofs, nested enums and
/// nested messages.
///
/// `scope` holds the names of the enclosing messages. Everything declared
/// inside a message is placed in a namespace named after the message path,
/// merging with the class of the same name.
pub fn write_message<'a>(
    w: &mut Printer,
    ctx: &mut FileContext<'a, '_>,
    message: &'a DescriptorProto,
    scope: &[&'a str],
) -> Result<(), Error> {
    let mut path = scope.to_vec();
    path.push(message.name());
    let qualified = path.join(".");
    trace!(message = %qualified, "emitting message");

    let enclosing = std::mem::replace(&mut ctx.scope, scope.to_vec());
    let fields = message
        .field
        .iter()
        .map(|fd| Field::new(fd, ctx))
        .collect::<Result<Vec<_>, _>>();
    ctx.scope = enclosing;
    let mut fields = fields?;

    let mut oneofs: Vec<Oneof<'_, 'a>> = message
        .oneof_decl
        .iter()
        .map(|decl| Oneof::new(decl.name.as_deref().unwrap_or_default(), &qualified))
        .collect();
    for field in &mut fields {
        if let Some(position) = oneof_position(field, message)? {
            field.set_oneof(oneofs[position].slot());
        }
    }
    for field in &fields {
        if let Some(position) = oneof_position(field, message)? {
            oneofs[position].push(field);
        }
    }

    if !scope.is_empty() {
        writeln!(w, "export namespace {} {{", scope.join("."))?;
    }

    writeln!(
        w,
        "export class {} implements {}.Message {{",
        message.name(),
        RUNTIME_ALIAS
    )?;
    for field in fields.iter().filter(|f| !f.is_oneof_member()) {
        writeln!(w, "{}: {};", field.name(), field.labeled_type())?;
    }
    for oneof in &oneofs {
        writeln!(w, "{}: {};", oneof.name(), oneof.union_type())?;
    }
    writeln!(w)?;

    writeln!(w, "constructor() {{")?;
    for field in fields.iter().filter(|f| !f.is_oneof_member()) {
        writeln!(w, "this.{} = {};", field.name(), field.default_value())?;
    }
    for oneof in &oneofs {
        writeln!(
            w,
            "this.{} = {}.OneofNotSet.singleton;",
            oneof.name(),
            RUNTIME_ALIAS
        )?;
    }
    writeln!(w, "}}")?;
    writeln!(w)?;

    writeln!(
        w,
        "MergeFrom(d: {}.Internal.Decoder): void {{",
        RUNTIME_ALIAS
    )?;
    writeln!(w, "while (!d.isEOF()) {{")?;
    writeln!(w, "let [fn, wt] = d.readTag();")?;
    writeln!(w, "switch(fn) {{")?;
    for field in &fields {
        writeln!(w, "case {}:", field.number())?;
        field.write_decoder(w, "d", "wt")?;
        writeln!(w, "break;")?;
    }
    writeln!(w, "default:")?;
    writeln!(w, "d.skipWireType(wt)")?;
    writeln!(w, "}}")?;
    writeln!(w, "}}")?;
    writeln!(w, "}}")?;
    writeln!(w)?;

    if fields.is_empty() {
        writeln!(
            w,
            "WriteTo(_: {}.Internal.Encoder): void {{}}",
            RUNTIME_ALIAS
        )?;
    } else {
        writeln!(
            w,
            "WriteTo(e: {}.Internal.Encoder): void {{",
            RUNTIME_ALIAS
        )?;
        for field in fields.iter().filter(|f| !f.is_oneof_member()) {
            field.write_encoder(w, "e")?;
        }
        for oneof in &oneofs {
            writeln!(w, "{}.WriteTo(this.{}, e);", oneof.namespace(), oneof.name())?;
        }
        writeln!(w, "}}")?;
    }
    writeln!(w, "}}")?;

    if !scope.is_empty() {
        writeln!(w, "}}")?;
    }
    writeln!(w)?;

    for oneof in &oneofs {
        write_oneof(w, oneof)?;
    }
    for enum_type in &message.enum_type {
        write_enum(w, enum_type, &path)?;
    }
    for nested in &message.nested_type {
        write_message(w, ctx, nested, &path)?;
    }

    Ok(())
}

/// Position of `field`'s oneof in `message.oneof_decl`, if it has one.
fn oneof_position(field: &Field<'_>, message: &DescriptorProto) -> Result<Option<usize>, Error> {
    let Some(index) = field.oneof_index() else {
        return Ok(None);
    };
    usize::try_from(index)
        .ok()
        .filter(|position| *position < message.oneof_decl.len())
        .map(Some)
        .ok_or_else(|| Error::Decode {
            message: "DescriptorProto",
            reason: format!(
                "field {} of {} references undeclared oneof {}",
                field.name(),
                message.name(),
                index
            ),
        })
}
