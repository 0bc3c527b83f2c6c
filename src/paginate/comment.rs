use std::collections::HashMap;

use crate::model::{ContentBlock, Group, GroupId, Report};

pub const LONG_COMMENT_CLASS: &str = "long-comment";

/// Thresholds for re-chunking tall `long-comment` groups before pagination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongCommentPolicy {
    /// Groups taller than this are chunked.
    pub trigger: f32,
    /// Maximum accumulated height of one chunk (a single taller block still
    /// forms a chunk of its own).
    pub chunk: f32,
}

impl Default for LongCommentPolicy {
    fn default() -> Self {
        Self {
            trigger: 300.0,
            chunk: 250.0,
        }
    }
}

/// Split every tall `long-comment` group into consecutive sub-groups of at
/// most `policy.chunk` units. The first chunk keeps the original id; later
/// chunks get `<id>~<n>` and the original classes minus `long-comment`.
/// Returns the number of sub-groups created.
pub fn chunk_long_comments(report: &mut Report, policy: &LongCommentPolicy) -> usize {
    let mut created = 0;
    for section in &mut report.sections {
        let mut start = 0;
        while start < section.blocks.len() {
            let Some(id) = section.blocks[start].group.clone() else {
                start += 1;
                continue;
            };
            let mut end = start + 1;
            while end < section.blocks.len() && section.blocks[end].group.as_ref() == Some(&id) {
                end += 1;
            }
            let is_long = report
                .groups
                .get(&id)
                .is_some_and(|g| g.has_class(LONG_COMMENT_CLASS));
            if is_long {
                let run = &mut section.blocks[start..end];
                created += chunk_run(run, &id, &mut report.groups, policy);
            }
            start = end;
        }
    }
    if created > 0 {
        log::debug!("long comments: {created} extra chunks");
    }
    created
}

/// Registers chunk `n` of `parent`. A name already used by another group
/// gets a numeric suffix until it is free.
fn register_chunk(parent: &Group, n: usize, groups: &mut HashMap<GroupId, Group>) -> GroupId {
    let mut chunk_id = GroupId::new(format!("{}~{n}", parent.id));
    let mut suffix = 1;
    while groups.contains_key(&chunk_id) {
        chunk_id = GroupId::new(format!("{}~{n}-{suffix}", parent.id));
        suffix += 1;
    }
    let chunk_group = Group {
        id: chunk_id.clone(),
        kind: parent.kind,
        classes: parent
            .classes
            .iter()
            .filter(|c| c.as_str() != LONG_COMMENT_CLASS)
            .cloned()
            .collect(),
    };
    groups.insert(chunk_id.clone(), chunk_group);
    chunk_id
}

fn chunk_run(
    run: &mut [ContentBlock],
    id: &GroupId,
    groups: &mut HashMap<GroupId, Group>,
    policy: &LongCommentPolicy,
) -> usize {
    let total: f32 = run.iter().map(|b| b.rendered_height).sum();
    if total <= policy.trigger {
        return 0;
    }
    let Some(parent) = groups.get(id).cloned() else {
        return 0;
    };

    let mut chunk_index = 0usize;
    let mut chunk_id: Option<GroupId> = None;
    let mut current_height = 0.0f32;
    for block in run.iter_mut() {
        if current_height > 0.0 && current_height + block.rendered_height > policy.chunk {
            chunk_index += 1;
            current_height = 0.0;
            chunk_id = Some(register_chunk(&parent, chunk_index, groups));
        }
        current_height += block.rendered_height;
        if let Some(chunk_id) = &chunk_id {
            block.group = Some(chunk_id.clone());
        }
    }
    chunk_index
}
