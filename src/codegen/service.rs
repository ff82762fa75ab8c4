//! gRPC client stub generation.

use std::fmt::Write;

use tracing::debug;

use super::printer::Printer;
use super::{FileContext, RUNTIME_ALIAS};
use crate::descriptor::{MethodDescriptorProto, ServiceDescriptorProto};
use crate::Error;

/// A unary method with its request and response types resolved.
struct Method<'a> {
    descriptor: &'a MethodDescriptorProto,
    input: String,
    output: String,
}

impl<'a> Method<'a> {
    fn new(descriptor: &'a MethodDescriptorProto, ctx: &mut FileContext<'a, '_>) -> Result<Self, Error> {
        let input = descriptor
            .input_type
            .as_deref()
            .ok_or(Error::MissingName("method input"))?;
        let output = descriptor
            .output_type
            .as_deref()
            .ok_or(Error::MissingName("method output"))?;
        Ok(Self {
            descriptor,
            input: ctx.type_reference(input)?.0,
            output: ctx.type_reference(output)?.0,
        })
    }
}

/// Emit a `<Service>Client` class for `service`.
///
/// Streaming methods are not supported by the runtime's client connection and
/// are left out.
pub fn write_service<'a>(
    w: &mut Printer,
    ctx: &mut FileContext<'a, '_>,
    service: &'a ServiceDescriptorProto,
    package: &str,
) -> Result<(), Error> {
    let mut methods = Vec::with_capacity(service.method.len());
    for method in &service.method {
        if method.is_streaming() {
            debug!(service = service.name(), method = method.name(), "skipping streaming method");
            continue;
        }
        methods.push(Method::new(method, ctx)?);
    }

    let route = if package.is_empty() {
        service.name().to_string()
    } else {
        format!("{}.{}", package, service.name())
    };

    writeln!(w, "export class {}Client {{", service.name())?;
    writeln!(w, "private cc: {}.Grpc.ClientConn;", RUNTIME_ALIAS)?;
    writeln!(w, "constructor(cc: {}.Grpc.ClientConn) {{", RUNTIME_ALIAS)?;
    writeln!(w, "this.cc = cc;")?;
    writeln!(w, "}}")?;
    for method in &methods {
        let name = method.descriptor.name();
        writeln!(w)?;
        writeln!(
            w,
            "async {}(min: {}, ...co: {}.Grpc.CallOption[]): Promise<{}> {{",
            name, method.input, RUNTIME_ALIAS, method.output
        )?;
        writeln!(w, "let mout = new {}();", method.output)?;
        writeln!(
            w,
            "await this.cc.Invoke('/{}/{}', min, mout, ...co);",
            route, name
        )?;
        writeln!(w, "return mout;")?;
        writeln!(w, "}}")?;
    }
    writeln!(w, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::test_util::{message, proto3_file};
    use crate::namespace::Namespace;

    fn method(name: &str, input: &str, output: &str, streaming: bool) -> MethodDescriptorProto {
        MethodDescriptorProto {
            name: Some(name.to_string()),
            input_type: Some(input.to_string()),
            output_type: Some(output.to_string()),
            client_streaming: None,
            server_streaming: Some(streaming),
        }
    }

    #[test]
    fn test_client_stub() {
        let deps = proto3_file("common/types.proto", "pkg", vec![message("Reply", vec![])]);
        let mut file = proto3_file("svc.proto", "pkg", vec![message("Request", vec![])]);
        file.service.push(ServiceDescriptorProto {
            name: Some("Greeter".to_string()),
            method: vec![
                method("Hello", ".pkg.Request", ".common.Missing", true),
                method("Say", ".pkg.Request", ".pkg.Reply", false),
            ],
        });
        let namespace = Namespace::from_files([&deps, &file]);
        let mut ctx = FileContext::new(&namespace, &file);
        let mut w = Printer::new();
        write_service(&mut w, &mut ctx, &file.service[0], file.package()).unwrap();

        insta::assert_snapshot!(w.finish().trim_end(), @r"
        export class GreeterClient {
          private cc: __pb__.Grpc.ClientConn;
          constructor(cc: __pb__.Grpc.ClientConn) {
            this.cc = cc;
          }

          async Say(min: Request, ...co: __pb__.Grpc.CallOption[]): Promise<___common_types_pb.Reply> {
            let mout = new ___common_types_pb.Reply();
            await this.cc.Invoke('/pkg.Greeter/Say', min, mout, ...co);
            return mout;
          }
        }
        ");
        assert_eq!(ctx.modules.imports().count(), 1);
    }

    #[test]
    fn test_default_package_route() {
        let mut file = proto3_file("svc.proto", "", vec![message("Ping", vec![])]);
        file.service.push(ServiceDescriptorProto {
            name: Some("Health".to_string()),
            method: vec![method("Check", ".Ping", ".Ping", false)],
        });
        let namespace = Namespace::from_files([&file]);
        let mut ctx = FileContext::new(&namespace, &file);
        let mut w = Printer::new();
        write_service(&mut w, &mut ctx, &file.service[0], file.package()).unwrap();
        assert!(w
            .finish()
            .contains("await this.cc.Invoke('/Health/Check', min, mout, ...co);"));
    }
}
