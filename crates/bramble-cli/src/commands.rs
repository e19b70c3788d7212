use std::fs;

use colored::Colorize;

use bramble_document::{BookDocument, DocumentError};
use bramble_engine::{Bookshelf, MediaStore};
use bramble_server::{BrambleServer, ServerConfig};
use bramble_types::OwnerId;

use crate::cli::{Cli, Command, LoadArgs, OutputFormat, ServeArgs, ValidateArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Validate(args) => cmd_validate(args, &cli.format),
        Command::Load(args) => cmd_load(args, &cli.format),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn cmd_validate(args: ValidateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let bytes = fs::read(&args.file)?;
    match BookDocument::from_slice(&bytes) {
        Ok(document) => {
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "name": document.name,
                        "waypoints": document.waypoint_count(),
                        "options": document.option_count(),
                    })
                ),
                OutputFormat::Text => {
                    println!(
                        "{} {} is a valid book document",
                        "✓".green().bold(),
                        args.file.display()
                    );
                    println!("  Name: {}", document.name.bold());
                    println!("  Waypoints: {}", document.waypoint_count());
                    println!("  Options: {}", document.option_count());
                }
            }
            Ok(())
        }
        Err(DocumentError::Malformed(issues)) => {
            eprintln!(
                "{} {} is malformed:",
                "✗".red().bold(),
                args.file.display()
            );
            for issue in &issues {
                eprintln!("  {}: {}", issue.location.yellow(), issue.message);
            }
            anyhow::bail!("document rejected with {} issue(s)", issues.len())
        }
        Err(err) => {
            eprintln!("{} {err}", "✗".red().bold());
            anyhow::bail!("document rejected")
        }
    }
}

fn cmd_load(args: LoadArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let owner = match &args.owner {
        Some(raw) => raw.parse::<OwnerId>()?,
        None => OwnerId::generate(),
    };
    let bytes = fs::read(&args.file)?;
    let shelf = Bookshelf::new(MediaStore::new("audio"));
    let summary = shelf.load_bytes(&bytes, owner)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("{} Loaded {}", "✓".green().bold(), summary.name.bold());
            println!("  Book: {}", summary.book.to_string().yellow());
            println!("  Owner: {}", owner.to_string().cyan());
            println!("  Waypoints: {}", summary.waypoints);
            println!("  Choices: {}", summary.choices);
        }
    }
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind.parse()?;
    }
    if let Some(audio_root) = args.audio_root {
        config.audio_root = audio_root;
    }

    let server = BrambleServer::new(config);
    println!(
        "Bramble server on {} (audio root: {})",
        server.config().bind_addr.to_string().bold(),
        server.config().audio_root.display()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}
