//! Command-line entry point: MusicXML in, styled Jianpu document out.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use jianpu_transcriber::convert_musicxml_to_jianpu;
use jianpu_transcriber::document::{DocumentSink, RtfSink, TextRunStyle};
use std::fs;
use std::path::PathBuf;

/// Transcribe a MusicXML score into a Jianpu (numbered notation) document.
#[derive(Parser, Debug)]
#[command(name = "mxl2jianpu", version, about)]
struct Cli {
    /// Input MusicXML file
    filename: PathBuf,

    /// Output document path; defaults to outputs/<timestamp>.rtf
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Font the token stream is rendered in
    #[arg(long, default_value = "jpfont-nds")]
    font_name: String,

    /// Point size of the rendered text run
    #[arg(long, default_value_t = 12)]
    font_size: u32,
}

fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .context("invalid log specification")?
        .start()
        .context("failed to start logger")?;

    let cli = Cli::parse();

    let xml = fs::read_to_string(&cli.filename)
        .with_context(|| format!("failed to read {}", cli.filename.display()))?;

    let result = convert_musicxml_to_jianpu(&xml)?;
    log::debug!("assembled token stream: {}", result.jianpu_source);

    let output = match cli.output {
        Some(path) => path,
        None => default_output_path()?,
    };

    let sink = RtfSink::new(TextRunStyle {
        font_name: cli.font_name,
        point_size: cli.font_size,
    });
    sink.render(&result.jianpu_source, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Score saved to {}", output.display());
    Ok(())
}

/// `outputs/<local timestamp>.rtf`, creating the directory when missing.
fn default_output_path() -> Result<PathBuf> {
    let dir = PathBuf::from("outputs");
    fs::create_dir_all(&dir).context("failed to create outputs directory")?;
    let stamp = Local::now().format("%Y_%m_%d_%H_%M_%S");
    Ok(dir.join(format!("{stamp}.rtf")))
}
