mod comment;
mod footer;

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

use crate::model::{BlockKind, ContentBlock, Group, GroupId, Page, PlacedBlock, Report};

pub use comment::{LongCommentPolicy, chunk_long_comments};
pub use footer::{DEFAULT_FOOTER, stamp_footers};

/// True when `blocks[i]` is the first row of a table whose header directly precedes it.
fn is_first_row(blocks: &[ContentBlock], i: usize) -> bool {
    let block = &blocks[i];
    block.kind == BlockKind::TableRow
        && i > 0
        && blocks[i - 1].kind == BlockKind::TableHeader
        && blocks[i - 1].same_group(block)
}

/// Height that has to fit before `blocks[i]` may be placed: a header is
/// measured together with its first row.
fn unit_height(blocks: &[ContentBlock], i: usize) -> f32 {
    let block = &blocks[i];
    if block.kind == BlockKind::TableHeader && i + 1 < blocks.len() && is_first_row(blocks, i + 1) {
        block.rendered_height + blocks[i + 1].rendered_height
    } else {
        block.rendered_height
    }
}

/// True when `blocks[i]` has to open a page. A hard reset on a table's first
/// row moves its header along with it.
fn opens_page(blocks: &[ContentBlock], i: usize) -> bool {
    if is_first_row(blocks, i) {
        return false;
    }
    blocks[i].hard_reset
        || (blocks[i].kind == BlockKind::TableHeader
            && i + 1 < blocks.len()
            && is_first_row(blocks, i + 1)
            && blocks[i + 1].hard_reset)
}

/// Greedy first-fit pagination of a measured block sequence into pages of
/// `capacity` units.
///
/// Blocks are never reordered, dropped or merged. A `hard_reset` block always
/// opens a page, a table header stays with its first row, and every page that
/// continues a table starts with a repeated copy of its header. A unit taller
/// than `capacity` ends up alone on its page instead of being rejected.
pub fn paginate(blocks: &[ContentBlock], capacity: f32) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::new();
    let mut current = Page::new(capacity);
    let mut remaining = capacity;
    let mut last_header: Option<&ContentBlock> = None;

    for (i, block) in blocks.iter().enumerate() {
        let mut close = opens_page(blocks, i) && !current.is_empty();

        if !close && !current.is_empty() && !is_first_row(blocks, i) {
            let needed = unit_height(blocks, i);
            if needed > remaining {
                log::debug!(
                    "page {} full: block {i} needs {needed:.1}, {remaining:.1} left",
                    pages.len() + 1
                );
                close = true;
            }
        } else if close {
            log::debug!("page {} closed by hard reset at block {i}", pages.len() + 1);
        }

        if close {
            pages.push(std::mem::replace(&mut current, Page::new(capacity)));
            remaining = capacity;
        }
        let overfull = current.used_height() > capacity;

        match block.kind {
            BlockKind::TableHeader => last_header = Some(block),
            BlockKind::TableRow if current.is_empty() => {
                if let Some(header) = last_header.filter(|h| h.same_group(block)) {
                    current.blocks.push(PlacedBlock {
                        block: header.clone(),
                        repeated: true,
                    });
                    remaining = (remaining - header.rendered_height).max(0.0);
                }
            }
            _ => {}
        }

        current.blocks.push(PlacedBlock {
            block: block.clone(),
            repeated: false,
        });
        remaining = (remaining - block.rendered_height).max(0.0);

        if !overfull && current.used_height() > capacity {
            log::warn!(
                "page {} overflows: block {i} brings it to {:.1} of {capacity:.1} units",
                pages.len() + 1,
                current.used_height()
            );
        }
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Paginate every section of a report. Each section opens a fresh page and
/// passes its `no_footer` flag on to the pages it produces.
pub fn paginate_report(report: &Report, capacity: f32) -> Vec<Page> {
    let mut pages = Vec::new();
    for (si, section) in report.sections.iter().enumerate() {
        let mut section_pages = paginate(&section.blocks, capacity);
        log::debug!(
            "section {si}: {} blocks -> {} pages",
            section.blocks.len(),
            section_pages.len()
        );
        for page in &mut section_pages {
            page.no_footer = section.no_footer;
        }
        pages.extend(section_pages);
    }
    pages
}

/// A contiguous run of one group's blocks on a single page. The first
/// fragment of a group stays in the original wrapper; later ones are new
/// wrappers carrying the group's classes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupFragment {
    pub group: GroupId,
    pub classes: Vec<String>,
    pub index: usize,
    pub continued: bool,
    /// Positions in `Page::blocks`.
    pub range: Range<usize>,
}

/// Fragments of every page, in page order. Empty fragments cannot occur.
pub fn group_fragments(
    pages: &[Page],
    groups: &HashMap<GroupId, Group>,
) -> Vec<Vec<GroupFragment>> {
    let mut seen: HashMap<&GroupId, usize> = HashMap::new();
    let mut out = Vec::with_capacity(pages.len());

    for page in pages {
        let mut fragments = Vec::new();
        let mut start = 0usize;
        while start < page.blocks.len() {
            let Some(id) = page.blocks[start].block.group.as_ref() else {
                start += 1;
                continue;
            };
            let mut end = start + 1;
            while end < page.blocks.len() && page.blocks[end].block.group.as_ref() == Some(id) {
                end += 1;
            }
            let count = seen.entry(id).or_insert(0);
            fragments.push(GroupFragment {
                group: id.clone(),
                classes: groups.get(id).map(|g| g.classes.clone()).unwrap_or_default(),
                index: *count,
                continued: *count > 0,
                range: start..end,
            });
            *count += 1;
            start = end;
        }
        out.push(fragments);
    }
    out
}
