use std::io::{Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use protoc_gen_ts::{Config, Error};

/// Generate TypeScript classes and wire codecs from proto3 schemas.
///
/// Without a subcommand this runs as a protoc plugin: it reads a
/// CodeGeneratorRequest from stdin and writes a CodeGeneratorResponse to
/// stdout.
#[derive(Parser)]
#[command(name = "protoc-gen-ts", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript for .proto files without going through protoc's
    /// plugin mechanism.
    Compile {
        /// Directory to search for imports. May be repeated.
        #[arg(short = 'I', long = "include", value_name = "DIR")]
        includes: Vec<PathBuf>,

        /// Output directory for generated files.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Emit gRPC client stubs for services.
        #[arg(long)]
        grpc: bool,

        /// Module the generated code imports the runtime from.
        #[arg(long)]
        library_import: Option<String>,

        /// Read an existing FileDescriptorSet (built with --include_imports)
        /// instead of running protoc.
        #[arg(long, value_name = "FILE")]
        descriptor_set: Option<PathBuf>,

        /// Path to the protoc executable.
        #[arg(long, env = "PROTOC")]
        protoc: Option<PathBuf>,

        /// The .proto files to generate.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    // stdout carries the plugin response, so logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        None => run_plugin(),
        Some(Commands::Compile {
            includes,
            out_dir,
            grpc,
            library_import,
            descriptor_set,
            protoc,
            files,
        }) => {
            let mut config = Config::new();
            config.out_dir(&out_dir).grpc(grpc);
            if let Some(library_import) = library_import {
                config.library_import(library_import);
            }
            if let Some(protoc) = protoc {
                config.protoc_path(protoc);
            }
            if let Some(descriptor_set) = descriptor_set {
                config
                    .skip_protoc_run()
                    .file_descriptor_set_path(descriptor_set);
            }
            config.compile_protos(files.as_slice(), includes.as_slice())
        }
    }
}

fn run_plugin() -> Result<(), Error> {
    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;

    let output = protoc_gen_ts::run_plugin(&input)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}
