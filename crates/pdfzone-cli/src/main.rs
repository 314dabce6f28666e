mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use pdfzone_core::{Point, Region};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdfzone",
    version,
    about = "Extract text from fixed regions of many PDFs into a spreadsheet"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a template to PDF files and write the text to an xlsx file
    Extract {
        /// PDF files, processed in the order given
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// Template JSON file
        #[arg(short, long, value_name = "FILE")]
        template: PathBuf,

        /// Destination xlsx file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// pdftotext executable to use
        #[arg(long, value_name = "PATH")]
        pdftotext: Option<PathBuf>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create and check template files
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Print the text fragments found inside one region of a PDF
    Inspect {
        /// PDF file
        pdf: PathBuf,

        /// Zero-based page index
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Region in document space
        #[arg(short, long, value_name = "X,Y,W,H", value_parser = parse_region)]
        region: Region,

        /// pdftotext executable to use
        #[arg(long, value_name = "PATH")]
        pdftotext: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Validate a template file and summarize it
    Validate {
        /// Path to template JSON file
        file: PathBuf,
    },
    /// Write a single-page template from regions given on the command line
    New {
        /// Zero-based page index the regions belong to
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Region in document space
        #[arg(short, long = "region", value_name = "X,Y,W,H", value_parser = parse_region)]
        regions: Vec<Region>,

        /// Drag corners in display space, converted with --scale
        #[arg(long = "drag", value_name = "X1,Y1,X2,Y2", value_parser = parse_drag)]
        drags: Vec<(Point, Point)>,

        /// Zoom factor the --drag coordinates were taken at
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Destination template file
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: PathBuf,
    },
}

fn parse_numbers(s: &str) -> Result<[f64; 4], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    let numbers: [f64; 4] = parts
        .try_into()
        .map_err(|_| format!("expected four comma-separated numbers, got '{s}'"))?;
    if numbers.iter().any(|n| !n.is_finite()) {
        return Err(format!("numbers must be finite, got '{s}'"));
    }
    Ok(numbers)
}

fn parse_region(s: &str) -> Result<Region, String> {
    let [x, y, width, height] = parse_numbers(s)?;
    Ok(Region::new(x, y, width, height))
}

fn parse_drag(s: &str) -> Result<(Point, Point), String> {
    let [x1, y1, x2, y2] = parse_numbers(s)?;
    Ok((Point::new(x1, y1), Point::new(x2, y2)))
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            documents,
            template,
            output,
            pdftotext,
            json,
        } => commands::extract::run(documents, template, output, pdftotext, json),
        Commands::Template { action } => match action {
            TemplateAction::Validate { file } => commands::template::validate(&file),
            TemplateAction::New {
                page,
                regions,
                drags,
                scale,
                out,
            } => commands::template::new(page, regions, drags, scale, &out),
        },
        Commands::Inspect {
            pdf,
            page,
            region,
            pdftotext,
        } => commands::inspect::run(&pdf, page, region, pdftotext),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
