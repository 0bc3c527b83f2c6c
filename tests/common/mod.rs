#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use report_paginator::model::{ContentBlock, Page};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/output")
        .join(case);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

/// Input blocks in page order, repeated headers left out.
pub fn flatten(pages: &[Page]) -> Vec<ContentBlock> {
    pages
        .iter()
        .flat_map(|p| p.original_blocks().cloned())
        .collect()
}

pub fn texts(page: &Page) -> Vec<&str> {
    page.blocks.iter().map(|p| p.block.text.as_str()).collect()
}

/// Number of page objects in a PDF written by the renderer.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let count = |needle: &[u8]| bytes.windows(needle.len()).filter(|w| *w == needle).count();
    count(&b"/Type /Page"[..]) - count(&b"/Type /Pages"[..])
}

/// Small xorshift generator so generated inputs are reproducible without an
/// extra dev-dependency.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    pub fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }
}

/// A random report body: loose paragraphs, tables (header then rows) and
/// comment groups, every block between 1 and `max_height` units tall.
pub fn random_blocks(rng: &mut XorShift, count: usize, max_height: u64) -> Vec<ContentBlock> {
    let mut blocks = Vec::with_capacity(count);
    let mut group_no = 0;
    fn height(rng: &mut XorShift, max_height: u64) -> f32 {
        (1 + rng.below(max_height)) as f32
    }

    while blocks.len() < count {
        match rng.below(3) {
            0 => {
                let mut b = ContentBlock::text(height(rng, max_height))
                    .with_text(format!("p{}", blocks.len()));
                if rng.chance(10) {
                    b = b.with_hard_reset();
                }
                blocks.push(b);
            }
            1 => {
                group_no += 1;
                let id = format!("table-{group_no}");
                let mut header =
                    ContentBlock::header(height(rng, max_height) / 4.0 + 1.0).in_group(id.as_str());
                if rng.chance(10) {
                    header = header.with_hard_reset();
                }
                blocks.push(header);
                for r in 0..1 + rng.below(12) {
                    let mut row = ContentBlock::row(height(rng, max_height))
                        .in_group(id.as_str())
                        .with_text(format!("{id}/r{r}"));
                    if rng.chance(5) {
                        row = row.with_hard_reset();
                    }
                    blocks.push(row);
                }
            }
            _ => {
                group_no += 1;
                let id = format!("comment-{group_no}");
                for s in 0..1 + rng.below(6) {
                    let mut b = ContentBlock::text(height(rng, max_height))
                        .in_group(id.as_str())
                        .with_text(format!("{id}/s{s}"));
                    if rng.chance(10) {
                        b = b.with_hard_reset();
                    }
                    blocks.push(b);
                }
            }
        }
    }
    blocks
}
