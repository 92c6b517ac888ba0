//! ikona - SVG icon compiler

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use ikona::{CompileOptions, Compiler};

#[derive(Parser)]
#[command(name = "ikona")]
#[command(version, about = "Compile SVG files into icon records", long_about = None)]
#[command(after_help = "EXAMPLES:
    ikona arrow-up.svg                  Print the icon record as JSON
    ikona arrow-up.svg -o arrow.json    Write the record to a file
    ikona arrow-up.svg --module         Emit an ES module (export default ...)
    ikona ArrowUp.svg --prefix fa --aliases up,north")]
struct Cli {
    /// Input SVG file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Default icon prefix
    #[arg(long, default_value = ikona::DEFAULT_PREFIX)]
    prefix: String,

    /// Treat a first filename word starting with the prefix as the prefix
    #[arg(long)]
    infer_prefix: bool,

    /// Override the icon name derived from the filename
    #[arg(long, value_name = "NAME")]
    icon_name: Option<String>,

    /// Comma-separated aliases
    #[arg(long, value_name = "LIST")]
    aliases: Option<String>,

    /// Emit an ES module (`export default ...`) instead of bare JSON
    #[arg(long)]
    module: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Suppress status messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let module_id = module_id(cli);

    let mut compiler = Compiler::new(CompileOptions {
        prefix: cli.prefix.clone(),
        infer_prefix: cli.infer_prefix,
        ..Default::default()
    });

    let record = compiler.compile_file(&module_id).map_err(|e| e.to_string())?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&record)
    } else {
        serde_json::to_string(&record)
    }
    .map_err(|e| e.to_string())?;

    let text = if cli.module {
        format!("export default {json}\n")
    } else {
        format!("{json}\n")
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| format!("failed to write {path}: {e}"))?;
            if !cli.quiet {
                eprintln!("wrote {path}");
            }
        }
        None => print!("{text}"),
    }

    Ok(())
}

/// Rebuild the module id the library expects: input path plus the query
/// parameters the flags stand in for.
fn module_id(cli: &Cli) -> String {
    let mut query = Vec::new();
    if let Some(name) = &cli.icon_name {
        query.push(format!("icon-name={}", encode(name)));
    }
    if let Some(aliases) = &cli.aliases {
        query.push(format!("aliases={}", encode(aliases)));
    }

    if query.is_empty() {
        cli.input.clone()
    } else {
        format!("{}?{}", cli.input, query.join("&"))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
