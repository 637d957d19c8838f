//! toolbridge CLI
//!
//! Convert and validate tool definitions between provider dialects.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod io;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use console::style;
use std::path::{Path, PathBuf};
use toolbridge_convert::{ConversionError, Converter, EngineConfig};
use toolbridge_core::{Diagnostic, DialectTag, Fingerprint, Severity};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolbridge")]
#[command(about = "toolbridge - tool schema conversion between LLM providers", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

// With neither flag, the config default applies
#[derive(Args, Debug, Clone, Copy, Default)]
struct Strictness {
    /// Fail on anything the target cannot represent
    #[arg(long, overrides_with = "no_strict")]
    strict: bool,
    /// Run leniently even if the config defaults to strict
    #[arg(long, overrides_with = "strict")]
    no_strict: bool,
}

impl Strictness {
    fn resolve(self, default: bool) -> bool {
        if self.strict {
            true
        } else if self.no_strict {
            false
        } else {
            default
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a tool definition to another provider
    Convert {
        /// Source provider
        #[arg(long)]
        from: DialectTag,
        /// Target provider
        #[arg(long)]
        to: DialectTag,
        #[command(flatten)]
        strictness: Strictness,
        /// Input file, `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a tool definition for a provider
    Validate {
        /// Provider to validate for
        #[arg(short, long)]
        provider: DialectTag,
        #[command(flatten)]
        strictness: Strictness,
        /// Input file, `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// List supported providers
    Providers,
    /// Print the content fingerprint of a tool definition
    Fingerprint {
        /// Provider the document is written for
        #[arg(long)]
        from: DialectTag,
        /// Fail unless the fingerprint equals this hex digest
        #[arg(long, value_parser = Fingerprint::from_hex)]
        expect: Option<Fingerprint>,
        /// Input file, `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let converter = load_converter(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            from,
            to,
            strictness,
            input,
            output,
        } => {
            let raw = io::read_document(input.as_deref())?;
            let strict = strictness.resolve(converter.default_strict());
            match converter.convert(&raw, from, to, strict) {
                Ok(conversion) => {
                    print_diagnostics(&conversion.diagnostics);
                    io::write_document(&conversion.document, output.as_deref())
                }
                Err(ConversionError::Rejected { diagnostics }) => {
                    print_diagnostics(&diagnostics);
                    bail!("conversion from {from} to {to} rejected");
                }
                Err(err) => Err(err).wrap_err(format!("conversion from {from} to {to} failed")),
            }
        }
        Commands::Validate {
            provider,
            strictness,
            input,
        } => {
            let raw = io::read_document(input.as_deref())?;
            let strict = strictness.resolve(converter.default_strict());
            let report = converter.validate(&raw, provider, strict)?;
            print_diagnostics(&report.diagnostics);
            if !report.is_valid {
                bail!(
                    "not valid for {provider}: {} error(s), {} warning(s)",
                    report.error_count,
                    report.warning_count
                );
            }
            println!(
                "{} valid for {provider} ({} warning(s))",
                style("ok").green().bold(),
                report.warning_count
            );
            Ok(())
        }
        Commands::Providers => {
            for info in converter.providers() {
                println!(
                    "{:<8} {:<17} nested={} non_string_enums={}",
                    info.name,
                    info.display_name,
                    info.capabilities.nested_structures,
                    info.capabilities.non_string_enums
                );
            }
            Ok(())
        }
        Commands::Fingerprint {
            from,
            expect,
            input,
        } => {
            let raw = io::read_document(input.as_deref())?;
            let fingerprint = converter.decode(&raw, from)?.fingerprint()?;
            println!("{fingerprint}");
            match expect {
                Some(expected) if expected != fingerprint => {
                    bail!("fingerprint mismatch: expected {expected}")
                }
                _ => Ok(()),
            }
        }
    }
}

/// Only warnings by default; stdout carries the converted document
const DEFAULT_FILTER: &str = "toolbridge=warn";

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_converter(config: Option<&Path>) -> Result<Converter> {
    let Some(path) = config else {
        return Ok(Converter::standard());
    };
    debug!(path = %path.display(), "loading engine config");
    let config = EngineConfig::from_path(path)?;
    Ok(Converter::from_config(&config)?)
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{}", render(diag));
    }
}

fn render(diag: &Diagnostic) -> String {
    let label = match diag.severity {
        Severity::Warning => style("warning").yellow().bold(),
        Severity::Error => style("error").red().bold(),
    };
    format!("{label}: {diag}")
}
