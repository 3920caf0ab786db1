//! pdfweave CLI - positioned PDF text to text, HTML, and DOCX

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfweave::convert::{self, ProgressEvent};
use pdfweave::{
    ConversionJob, ConvertOptions, Converter, JsonFormat, JsonLinesSource, Pdfweave, TargetFormat,
};

#[derive(Parser)]
#[command(name = "pdfweave")]
#[command(version)]
#[command(about = "Convert positioned PDF text fragments to text, HTML, and DOCX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a fragment file to txt, html, or docx
    Convert {
        /// Input fragment file (one JSON page object per line)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Target format: txt, html, or docx
        #[arg(short, long, default_value = "txt")]
        format: String,

        /// Output file (next to the input if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// JSON file with conversion options
        #[arg(short, long, value_name = "FILE", env = "PDFWEAVE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the reconstructed document as plain text
    Preview {
        /// Input fragment file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON file with conversion options
        #[arg(short, long, value_name = "FILE", env = "PDFWEAVE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Dump the reconstructed document structure as JSON
    Inspect {
        /// Input fragment file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            format,
            output,
            config,
        }) => cmd_convert(&input, &format, output.as_deref(), config.as_deref()),
        Some(Commands::Preview { input, config }) => cmd_preview(&input, config.as_deref()),
        Some(Commands::Inspect {
            input,
            output,
            compact,
        }) => cmd_inspect(&input, output.as_deref(), compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfweave convert <FILE> --format txt|html|docx".yellow());
            println!("       pdfweave --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(config: Option<&Path>) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
    match config {
        Some(path) => {
            log::debug!("Loading options from {}", path.display());
            let json = fs::read_to_string(path)?;
            Ok(ConvertOptions::from_json(&json)?)
        }
        None => Ok(ConvertOptions::default()),
    }
}

fn cmd_convert(
    input: &Path,
    format: &str,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: TargetFormat = format.parse()?;
    let options = load_options(config)?;

    let mut job = ConversionJob::new(input, format);
    if let Some(path) = output {
        job = job.with_output(path);
    }
    let source = JsonLinesSource::open(input)?;
    log::debug!(
        "Converting {} to {} as {}",
        input.display(),
        job.output_path().display(),
        format
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let handle = convert::spawn(Converter::new(options), job, source)?;
    for event in handle.progress().iter() {
        match event {
            ProgressEvent::Message(line) => pb.set_message(line),
            ProgressEvent::Finished(_) => pb.finish_with_message("Conversion Finished!"),
            ProgressEvent::Failed(err) => pb.abandon_with_message(err.red().to_string()),
        }
    }

    let path = handle.join()?;
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_preview(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(config)?;
    let mut source = JsonLinesSource::open(input)?;

    let text = Pdfweave::new()
        .with_options(options)
        .load(&mut source)?
        .to_text()?;
    print!("{}", text);

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = JsonLinesSource::open(input)?;
    let result = Pdfweave::new().load(&mut source)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = result.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    let doc = result.document();
    eprintln!("{}", "Document Statistics".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "Pages".bold(), doc.page_count);
    eprintln!("{}: {}", "Blocks".bold(), doc.len());
    eprintln!("{}: {}", "Headings".bold(), doc.heading_count());
    eprintln!("{}: {}", "List items".bold(), doc.list_item_count());
    eprintln!(
        "{}: {}",
        "Words".bold(),
        doc.plain_text().split_whitespace().count()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfweave".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Positioned PDF text to text, HTML, and DOCX");
    println!();
    println!("Formats: {}", TargetFormat::ALL.map(|f| f.extension()).join(", "));
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_options_defaults_without_config() {
        let options = load_options(None).unwrap();
        assert_eq!(options, ConvertOptions::default());
    }

    #[test]
    fn test_load_options_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"render":{{"title":"Minutes"}}}}"#).unwrap();

        let options = load_options(Some(file.path())).unwrap();
        assert_eq!(options.render.title, "Minutes");
        assert!(options.layout.detect_lists);
    }

    #[test]
    fn test_load_options_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_options(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("options"));
    }
}
