use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use brine_equal_compiler::{compile_schema, generate_rust, GeneratorConfig};
use brine_equal_compiler::error::KiwiError;
use brine_equal::decode_to_json;

#[derive(Parser)]
#[command(name = "bequal")]
#[command(about = "Compile Kiwi schemas and generate Rust types with Equal / VerboseEqual", long_about = None)]
struct Cli {
    /// Log debug output (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a `.kiwi` IDL file to a binary `.kiwi.bin`
    Compile {
        /// Input `.kiwi` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.kiwi.bin` file (defaults to same name + `.kiwi.bin`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a `.kiwi.bin` file to JSON (printed to stdout)
    Decode {
        /// Input `.kiwi.bin` file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Generate Rust types and comparisons from a `.kiwi` schema
    GenRust {
        /// Input `.kiwi` schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: GenOptions,
    },
}

/// Overrides for the schema's own `option` statements.
#[derive(Args)]
struct GenOptions {
    /// JSON file with generator settings; flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generate `Equal` for every record type
    #[arg(long)]
    equal_all: bool,

    /// Generate `VerboseEqual` for every record type
    #[arg(long)]
    verbose_equal_all: bool,

    /// Generate populate helpers and round-trip self-tests
    #[arg(long)]
    testgen_all: bool,

    /// Keep extensions as an opaque byte blob instead of a tag map
    #[arg(long)]
    extensions_bytes: bool,
}

impl GenOptions {
    fn resolve(&self) -> Result<GeneratorConfig, KiwiError> {
        let file = match &self.config {
            Some(path) => GeneratorConfig::from_path(path)?,
            None => GeneratorConfig::default(),
        };
        let flags = GeneratorConfig {
            equal_all:          self.equal_all.then_some(true),
            verbose_equal_all:  self.verbose_equal_all.then_some(true),
            testgen_all:        self.testgen_all.then_some(true),
            extensions_map_all: self.extensions_bytes.then_some(false),
        };
        Ok(file.merge(flags))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn default_output(input: &Path, extension: &str) -> PathBuf {
    let mut p = input.to_path_buf();
    p.set_extension(extension);
    p
}

fn main() -> Result<(), KiwiError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Compile { input, output } => {
            let text = fs::read_to_string(input)?;
            let (_schema, bin) = compile_schema(&text)?;
            let out_path = output.clone().unwrap_or_else(|| default_output(input, "kiwi.bin"));
            fs::write(&out_path, &bin)?;
            info!(bytes = bin.len(), "wrote binary schema");
            println!("Compiled {} → {}", input.display(), out_path.display());
            Ok(())
        }

        Commands::Decode { input } => {
            let data = fs::read(input)?;
            let json = decode_to_json(&data)?;
            println!("{}", json);
            Ok(())
        }

        Commands::GenRust { input, output, options } => {
            let text = fs::read_to_string(input)?;
            let config = options.resolve()?;
            info!(?config, "generating rust");
            let rust_code = generate_rust(&text, &config)?;
            if let Some(out_path) = output {
                fs::write(out_path, &rust_code)?;
                println!("Generated Rust code written to {}", out_path.display());
            } else {
                println!("{}", rust_code);
            }
            Ok(())
        }
    }
}
