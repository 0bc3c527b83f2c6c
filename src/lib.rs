mod error;
mod fonts;
pub mod measure;
pub mod model;
pub mod paginate;
mod pdf;
pub mod plan;
pub mod report;

pub use error::Error;
pub use measure::{DeclaredHeights, Measure, TextMetrics};
pub use model::{BlockKind, ContentBlock, Page, PrintTarget, Report};
pub use paginate::{LongCommentPolicy, paginate, paginate_report, stamp_footers};
pub use pdf::render as render_pdf;

use std::path::Path;
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct Options {
    pub target: PrintTarget,
    /// Footer template; overrides the one found in the report.
    pub footer: Option<String>,
    /// `None` disables long-comment chunking.
    pub long_comments: Option<LongCommentPolicy>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            target: PrintTarget::default(),
            footer: None,
            long_comments: Some(LongCommentPolicy::default()),
        }
    }
}

/// Chunk, paginate and stamp a parsed report.
pub fn build_pages(report: &mut Report, options: &Options) -> Vec<Page> {
    if let Some(policy) = &options.long_comments {
        paginate::chunk_long_comments(report, policy);
    }
    let mut pages = paginate_report(report, options.target.capacity);
    let footer = options
        .footer
        .as_deref()
        .or(report.footer_template.as_deref())
        .unwrap_or(paginate::DEFAULT_FOOTER);
    stamp_footers(&mut pages, footer);
    pages
}

fn read_report(input: &Path, options: &Options) -> Result<Report, Error> {
    let measure = DeclaredHeights {
        fallback: TextMetrics {
            content_width: options.target.content_width(),
            units_per_point: 1.0 / options.target.scale(),
            ..TextMetrics::default()
        },
    };
    report::parse(input, &measure)
}

/// Paginate a report and write the PDF preview, plus the JSON plan when
/// `plan_output` is given.
pub fn convert_report_to_pdf(
    input: &Path,
    output: &Path,
    plan_output: Option<&Path>,
    options: &Options,
) -> Result<usize, Error> {
    if !(options.target.capacity > 0.0) {
        return Err(Error::InvalidReport(format!(
            "page capacity must be positive, got {}",
            options.target.capacity
        )));
    }
    let t0 = Instant::now();

    let mut report = read_report(input, options)?;
    let t_parse = t0.elapsed();

    let pages = build_pages(&mut report, options);
    let t_paginate = t0.elapsed();

    let bytes = pdf::render(&pages, &options.target)?;
    std::fs::write(output, &bytes).map_err(Error::Io)?;
    if let Some(plan_path) = plan_output {
        let json = plan::to_json(&pages, &report.groups)?;
        std::fs::write(plan_path, json).map_err(Error::Io)?;
    }
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, paginate={:.1}ms, write={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_paginate - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_paginate).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        bytes.len(),
    );

    Ok(pages.len())
}
