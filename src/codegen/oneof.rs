//! Oneof generation.
//!
//! Each oneof becomes a TypeScript namespace holding one variant class per
//! member, a union over those classes and the runtime's `OneofNotSet`
//! sentinel, and a `WriteTo` dispatcher encoding whichever variant is set.

use std::fmt::Write;

use super::field::{Field, OneofSlot};
use super::printer::Printer;
use super::RUNTIME_ALIAS;
use crate::Error;

/// Name of the union type declared in every oneof namespace.
pub const UNION_TYPE: &str = "oneof_type";

/// The members of one oneof declaration, in declaration order.
#[derive(Debug)]
pub struct Oneof<'f, 'a> {
    name: &'a str,
    namespace: String,
    fields: Vec<&'f Field<'a>>,
}

impl<'f, 'a> Oneof<'f, 'a> {
    /// `scope` is the dotted path of the owning message, e.g. `Outer.Inner`.
    pub fn new(name: &'a str, scope: &str) -> Self {
        Self {
            name,
            namespace: format!("{}.{}", scope, name),
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, field: &'f Field<'a>) {
        self.fields.push(field);
    }

    /// The property name on the owning message.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Qualified path of the namespace holding the variants.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The fully-qualified union type of the oneof property.
    pub fn union_type(&self) -> String {
        format!("{}.{}", self.namespace, UNION_TYPE)
    }

    /// How member fields refer back to this oneof.
    pub fn slot(&self) -> OneofSlot {
        OneofSlot {
            property: self.name.to_string(),
            namespace: self.namespace.clone(),
        }
    }
}

/// Emit the variant classes, union type and dispatcher for `oneof`.
pub fn write_oneof(w: &mut Printer, oneof: &Oneof<'_, '_>) -> Result<(), Error> {
    writeln!(w, "export namespace {} {{", oneof.namespace)?;

    let mut variants = vec![format!("{}.OneofNotSet", RUNTIME_ALIAS)];
    for field in &oneof.fields {
        let value_type = field.labeled_type();
        writeln!(w, "export class {} {{", field.name())?;
        writeln!(w, "static readonly kind = {};", field.number())?;
        writeln!(w, "readonly kind = {};", field.number())?;
        writeln!(w, "value: {};", value_type)?;
        writeln!(w, "constructor(v: {}) {{", value_type)?;
        writeln!(w, "this.value = v;")?;
        writeln!(w, "}}")?;
        writeln!(w, "}}")?;
        writeln!(w)?;
        variants.push(field.name().to_string());
    }

    writeln!(w, "export type {} = {};", UNION_TYPE, variants.join(" | "))?;
    writeln!(w)?;
    writeln!(
        w,
        "export function WriteTo(oo: {}, e: {}.Internal.Encoder):void {{",
        UNION_TYPE, RUNTIME_ALIAS
    )?;
    writeln!(w, "switch (oo.kind) {{")?;
    for field in &oneof.fields {
        let value = format!("(oo as {}).value", field.name());
        writeln!(w, "case {}:", field.number())?;

        if field.is_message() {
            writeln!(w, "{{")?;
            writeln!(w, "let nested = new {}.Internal.Encoder();", RUNTIME_ALIAS)?;
            writeln!(w, "let msg = {};", value)?;
            writeln!(w, "if (msg != null) {{")?;
            writeln!(w, "msg.WriteTo(nested);")?;
            writeln!(w, "}}")?;
            writeln!(w, "e.writeEncoder(nested, {});", field.number())?;
            writeln!(w, "return")?;
            writeln!(w, "}}")?;
            continue;
        }

        writeln!(w, "{};", field.tag_writer("e"))?;
        writeln!(w, "{};", field.writer("e", &value)?)?;
        writeln!(w, "return;")?;
    }
    writeln!(w, "}}")?;
    writeln!(w, "}}")?;

    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}
