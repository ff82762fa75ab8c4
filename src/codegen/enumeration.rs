//! Enum generation.

use std::fmt::Write;

use super::printer::Printer;
use crate::descriptor::EnumDescriptorProto;
use crate::Error;

/// Emit `enum_type` as an `export const enum`.
///
/// `scope` holds the names of the enclosing messages; a nested enum is wrapped
/// in `export namespace Outer.Inner { ... }`. Values keep their declared
/// numbers, so aliases come out verbatim.
pub fn write_enum(w: &mut Printer, enum_type: &EnumDescriptorProto, scope: &[&str]) -> Result<(), Error> {
    if !scope.is_empty() {
        writeln!(w, "export namespace {} {{", scope.join("."))?;
    }
    writeln!(w, "export const enum {} {{", enum_type.name())?;
    for value in &enum_type.value {
        writeln!(
            w,
            "{} = {},",
            value.name.as_deref().unwrap_or_default(),
            value.number.unwrap_or_default()
        )?;
    }
    writeln!(w, "}}")?;
    if !scope.is_empty() {
        writeln!(w, "}}")?;
    }
    writeln!(w)?;
    Ok(())
}
