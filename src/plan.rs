//! JSON export of a paginated plan.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Error;
use crate::model::{Footer, Group, GroupId, Page, PlacedBlock};
use crate::paginate::{GroupFragment, group_fragments};

#[derive(Serialize)]
struct PageEntry<'a> {
    number: usize,
    used_height: f32,
    no_footer: bool,
    footer: Option<&'a Footer>,
    blocks: &'a [PlacedBlock],
    fragments: Vec<GroupFragment>,
}

#[derive(Serialize)]
struct Plan<'a> {
    capacity: f32,
    page_count: usize,
    pages: Vec<PageEntry<'a>>,
}

pub fn to_json(pages: &[Page], groups: &HashMap<GroupId, Group>) -> Result<String, Error> {
    let fragments = group_fragments(pages, groups);
    let plan = Plan {
        capacity: pages.first().map_or(0.0, |p| p.capacity),
        page_count: pages.len(),
        pages: pages
            .iter()
            .zip(fragments)
            .enumerate()
            .map(|(i, (page, fragments))| PageEntry {
                number: i + 1,
                used_height: page.used_height(),
                no_footer: page.no_footer,
                footer: page.footer.as_ref(),
                blocks: &page.blocks,
                fragments,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&plan)?)
}
