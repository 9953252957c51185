mod check;
mod dump;
mod info;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tacho_ir::{StructuredFile, UnknownTagPolicy, UnmarshalOptions};

#[derive(Parser)]
#[command(name = "ddd-tool", about = "Inspect and round-trip tachograph .DDD downloads")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Show file type, card type or transfers, and a SHA-256 fingerprint
    Info {
        input: PathBuf,

        /// Handling of unparseable vehicle unit transfers
        #[arg(long, value_enum, default_value_t = TagPolicy::Preserve)]
        unknown_tag: TagPolicy,
    },

    /// Serialise the decoded tree as JSON or YAML
    Dump {
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = TagPolicy::Preserve)]
        unknown_tag: TagPolicy,
    },

    /// Decode, re-encode and compare each file byte for byte
    Check {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Only report failures
        #[arg(short, long)]
        quiet: bool,

        #[arg(long, value_enum, default_value_t = TagPolicy::Preserve)]
        unknown_tag: TagPolicy,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TagPolicy {
    Fail,
    Preserve,
    Resync,
}

impl TagPolicy {
    pub fn options(self) -> UnmarshalOptions {
        let unknown_vu_tag = match self {
            Self::Fail => UnknownTagPolicy::Fail,
            Self::Preserve => UnknownTagPolicy::PreserveRemainder,
            Self::Resync => UnknownTagPolicy::Resync,
        };
        UnmarshalOptions { unknown_vu_tag }
    }
}

pub fn read_input(input: &Path) -> Result<Vec<u8>> {
    std::fs::read(input).with_context(|| format!("reading {}", input.display()))
}

pub fn parse_input(input: &Path, data: &[u8], options: &UnmarshalOptions) -> Result<StructuredFile> {
    tacho_ir::unmarshal_file_with(data, options).with_context(|| format!("decoding {}", input.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str())).init();

    match cli.command {
        Command::Info { input, unknown_tag } => info::run_info(&input, &unknown_tag.options()),
        Command::Dump {
            input,
            format,
            output,
            unknown_tag,
        } => dump::run_dump(&input, format, output.as_deref(), &unknown_tag.options()),
        Command::Check {
            inputs,
            quiet,
            unknown_tag,
        } => check::run_check(&inputs, quiet, &unknown_tag.options()),
    }
}
