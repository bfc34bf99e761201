//! yps CLI - print YAML values with their positions

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yps::{AliasPosition, LoadOptions, NativeType, Value};

mod render;

#[derive(Parser)]
#[command(name = "yps")]
#[command(version)]
#[command(about = "Load YAML and show where every value came from", long_about = None)]
struct Cli {
    /// Input file (reads stdin when omitted or '-')
    input: Option<PathBuf>,

    /// Load every document instead of only the first
    #[arg(short, long)]
    all: bool,

    /// Resolve anchors and aliases
    #[arg(long)]
    aliases: bool,

    /// Report aliases at the alias rather than at the anchor
    #[arg(long, requires = "aliases")]
    alias_site: bool,

    /// Permit a non-baseline type (date, symbol, binary, or a tag such as '!point')
    #[arg(short, long, value_name = "TYPE")]
    permit: Vec<NativeType>,

    /// Permit only these symbol names (implies --permit symbol)
    #[arg(long, value_name = "NAME")]
    permit_symbol: Vec<String>,

    /// Convert string mapping keys to symbols
    #[arg(long)]
    symbolize_keys: bool,

    /// Treat '1,000' as a string
    #[arg(long)]
    strict_integer: bool,

    /// Filename to report in positions (defaults to the input path)
    #[arg(long)]
    filename: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One line per value: position, path and value
    Text,
    /// Nested JSON with a position object beside every wrapped value
    Json,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::new()
            .permit_types(self.permit.iter().cloned())
            .with_aliases(self.aliases)
            .with_symbolize_keys(self.symbolize_keys)
            .with_strict_integer(self.strict_integer);
        if self.alias_site {
            options = options.with_alias_position(AliasPosition::AliasSite);
        }
        if !self.permit_symbol.is_empty() {
            options = options.permit_type(NativeType::Symbol);
            for name in &self.permit_symbol {
                options = options.permit_symbol(name.as_str());
            }
        }
        if let Some(filename) = &self.filename {
            options = options.with_filename(filename.as_str());
        }
        options
    }

    /// The input file, unless reading from stdin.
    fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

fn load(cli: &Cli, options: &LoadOptions) -> Result<Value> {
    let Some(path) = cli.input_path() else {
        debug!("reading YAML from stdin");
        let stdin = std::io::stdin().lock();
        let value = if cli.all {
            yps::load_all_reader(stdin, options)
        } else {
            yps::load_reader(stdin, options)
        };
        return value.context("Failed to load <stdin>");
    };

    let value = if cli.filename.is_some() {
        // Positions report --filename instead of the path.
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        if cli.all {
            yps::load_all_reader(file, options)
        } else {
            yps::load_reader(file, options)
        }
    } else if cli.all {
        yps::load_all_file(path, options)
    } else {
        yps::load_file(path, options)
    };
    value.with_context(|| format!("Failed to load {}", path.display()))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yps=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = cli.load_options();
    let value = load(&cli, &options)?;
    print(&value, cli.format)
}

fn print(value: &Value, format: Format) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match format {
        Format::Text => render::write_text(&mut stdout, value)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut stdout, &render::to_json(value)?)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
