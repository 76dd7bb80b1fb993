use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use tealasm_common::{Assembler, OpcodeTable};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Bin,
    Hex,
}

#[derive(Parser, Debug)]
#[command(name = "tealasm")]
#[command(about = "TEAL assembler CLI", long_about = None)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(default_value = "-")]
    input: String,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    out: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Bin)]
    format: Format,

    /// Opcode specification JSON to use instead of the bundled table
    #[arg(long)]
    spec: Option<String>,

    /// Program version written at the start of the output
    #[arg(long, default_value_t = tealasm_common::assembler::DEFAULT_VERSION)]
    version_byte: u64,

    /// Log every assembled op
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tealasm=debug,tealasm_common=debug" } else { "tealasm=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_table(spec: Option<&str>) -> Result<OpcodeTable> {
    match spec {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {path}"))?;
            OpcodeTable::from_reader(BufReader::new(file))
                .with_context(|| format!("loading opcode spec {path}"))
        }
        None => Ok(OpcodeTable::embedded()?),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let input = if args.input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("reading {}", args.input))?
    };

    let table = load_table(args.spec.as_deref())?;
    tracing::debug!(ops = table.len(), "loaded opcode table");

    let source_name = if args.input == "-" { "<stdin>" } else { args.input.as_str() };
    let mut assembler = Assembler::new(table)
        .with_version(args.version_byte)
        .with_source_name(source_name);
    assembler.assemble_source(&input)?;
    let program = assembler.finalize()?;
    tracing::info!(bytes = program.len(), "assembled {}", source_name);

    let encoded = match args.format {
        Format::Bin => program,
        Format::Hex => format!("{}\n", hex::encode(&program)).into_bytes(),
    };

    if args.out == "-" {
        io::stdout().write_all(&encoded)?;
    } else {
        std::fs::write(&args.out, &encoded).with_context(|| format!("writing {}", args.out))?;
    }

    Ok(())
}
