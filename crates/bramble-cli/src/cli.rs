use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bramble",
    about = "Bramble — branching audiobook platform",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a book document without loading it
    Validate(ValidateArgs),
    /// Load a book document and print the resulting graph summary
    Load(LoadArgs),
    /// Start the Bramble server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the JSON book document
    pub file: PathBuf,
}

#[derive(Args)]
pub struct LoadArgs {
    /// Path to the JSON book document
    pub file: PathBuf,
    /// Owner to attribute the book to (UUID); a fresh one is minted if absent
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<String>,
    /// Override the configured audio root directory
    #[arg(long)]
    pub audio_root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_validate() {
        let cli = Cli::try_parse_from(["bramble", "validate", "book.json"]).unwrap();
        if let Command::Validate(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("book.json"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_load_with_owner() {
        let cli = Cli::try_parse_from([
            "bramble",
            "load",
            "book.json",
            "--owner",
            "0191e3a0-0000-7000-8000-000000000000",
        ])
        .unwrap();
        if let Command::Load(args) = cli.command {
            assert_eq!(args.owner.as_deref(), Some("0191e3a0-0000-7000-8000-000000000000"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "bramble",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--audio-root",
            "/tmp/audio",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
            assert_eq!(args.audio_root, Some(PathBuf::from("/tmp/audio")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["bramble", "--verbose", "validate", "b.json"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli =
            Cli::try_parse_from(["bramble", "--format", "json", "validate", "b.json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn serve_requires_no_arguments() {
        let cli = Cli::try_parse_from(["bramble", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve(_)));
    }
}
