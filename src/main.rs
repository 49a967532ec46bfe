//! # Flowtext CLI
//!
//! Usage:
//!   flowtext outline.txt -o flowchart.png
//!   echo "1. Start\n2. End" | flowtext --text-only
//!   flowtext outline.txt --generate > flowchart.uri

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use flowtext::{FlowError, FlowGenerator, RenderConfig, VeniceClient};

/// Turn a numbered outline into a flowchart image
#[derive(Parser)]
#[command(name = "flowtext")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Outline file to read (default: stdin)
    input: Option<PathBuf>,

    /// Write the PNG here instead of printing a data URI
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON render configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the preferred font files
    #[arg(long, value_name = "DIR")]
    font_dir: Option<PathBuf>,

    /// Expand the outline with the text-generation service first (needs VENICE_API_KEY)
    #[arg(long)]
    generate: bool,

    /// Print the box-drawing text instead of rendering an image
    #[arg(long, conflicts_with = "json")]
    text_only: bool,

    /// Print the laid-out lines and their roles as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), FlowError> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(dir) = &cli.font_dir {
        config.fonts.font_dir = dir.clone();
    }

    let outline = if cli.generate {
        let client = VeniceClient::from_env()?;
        client.generate(&flowtext::outline::describe_flow(&input))?
    } else {
        input
    };

    let lines = flowtext::layout(&outline);

    if cli.text_only {
        println!("{}", flowtext::layout::to_text(&lines));
        return Ok(());
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&lines).map_err(io::Error::from)?);
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let png = flowtext::render_png(&lines, &config)?;
            fs::write(path, &png)?;
            eprintln!("✓ Written {} bytes to {}", png.len(), path.display());
        }
        None => println!("{}", flowtext::render(&lines, &config)?),
    }
    Ok(())
}
