use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use report_paginator::{Options, PrintTarget, convert_report_to_pdf};

/// Split a measured XHTML health report into fixed-height A4 pages.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Report to paginate (XHTML with data-height measurements)
    input: PathBuf,

    /// PDF preview to write [default: <input>.pdf]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the page plan as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Height budget of one page, in measurement units
    #[arg(long, default_value_t = 1000.0)]
    capacity: f32,

    /// Footer text; `{page}` and `{pages}` are replaced by page numbers
    #[arg(long)]
    footer: Option<String>,

    /// Keep long comments in one piece instead of re-chunking them
    #[arg(long)]
    no_chunk: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    let mut options = Options {
        target: PrintTarget::a4().with_capacity(cli.capacity),
        footer: cli.footer,
        ..Options::default()
    };
    if cli.no_chunk {
        options.long_comments = None;
    }

    match convert_report_to_pdf(&cli.input, &output, cli.json.as_deref(), &options) {
        Ok(pages) => {
            println!("{} -> {} ({pages} pages)", cli.input.display(), output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
