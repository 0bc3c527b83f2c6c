use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    TableRow,
    TableHeader,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One visually atomic unit of report content: a paragraph fragment, a table
/// row or a sentence group of a comment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentBlock {
    pub rendered_height: f32, // capacity units, includes margin_bottom
    pub kind: BlockKind,
    pub hard_reset: bool,
    pub group: Option<GroupId>,
    pub text: String,
    pub margin_bottom: f32,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, rendered_height: f32) -> Self {
        Self {
            rendered_height: rendered_height.max(0.0),
            kind,
            hard_reset: false,
            group: None,
            text: String::new(),
            margin_bottom: 0.0,
        }
    }

    pub fn text(rendered_height: f32) -> Self {
        Self::new(BlockKind::Text, rendered_height)
    }

    pub fn header(rendered_height: f32) -> Self {
        Self::new(BlockKind::TableHeader, rendered_height)
    }

    pub fn row(rendered_height: f32) -> Self {
        Self::new(BlockKind::TableRow, rendered_height)
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(GroupId::new(group));
        self
    }

    pub fn with_hard_reset(mut self) -> Self {
        self.hard_reset = true;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_margin_bottom(mut self, margin: f32) -> Self {
        self.margin_bottom = margin.max(0.0);
        self
    }

    pub(crate) fn same_group(&self, other: &ContentBlock) -> bool {
        self.group.is_some() && self.group == other.group
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Table,
    Comment,
}

/// A named contiguous run of blocks that may be spread over several pages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub kind: GroupKind,
    /// CSS classification of the wrapper, reapplied to every continuation fragment.
    pub classes: Vec<String>,
}

impl Group {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One source page container (`.pagebreak`) of the report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Section {
    pub blocks: Vec<ContentBlock>,
    pub no_footer: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub sections: Vec<Section>,
    pub groups: HashMap<GroupId, Group>,
    /// Footer template found in the document (`#footer-content`), if any.
    pub footer_template: Option<String>,
}

impl Report {
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedBlock {
    #[serde(flatten)]
    pub block: ContentBlock,
    /// True for a table header cloned onto the top of a continuation page.
    pub repeated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Footer {
    pub text: String,
    pub page_number: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    pub capacity: f32,
    pub blocks: Vec<PlacedBlock>,
    pub no_footer: bool,
    pub footer: Option<Footer>,
}

impl Page {
    pub fn new(capacity: f32) -> Self {
        Self {
            capacity,
            blocks: Vec::new(),
            no_footer: false,
            footer: None,
        }
    }

    pub fn used_height(&self) -> f32 {
        self.blocks.iter().map(|p| p.block.rendered_height).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks taken from the input sequence, without repeated headers.
    pub fn original_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks.iter().filter(|p| !p.repeated).map(|p| &p.block)
    }
}

/// Physical page the plan is printed on, and the height budget it maps to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrintTarget {
    pub capacity: f32,       // height budget per page, in measurement units
    pub page_width: f32,     // points
    pub page_height: f32,    // points
    pub margin: f32,         // points, all four sides
    pub footer_height: f32,  // points reserved below the content box
}

impl Default for PrintTarget {
    fn default() -> Self {
        Self::a4()
    }
}

impl PrintTarget {
    pub fn a4() -> Self {
        Self {
            capacity: 1000.0,
            page_width: 595.0,
            page_height: 842.0,
            margin: 40.0,
            footer_height: 40.0,
        }
    }

    pub fn with_capacity(mut self, capacity: f32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin - self.footer_height
    }

    /// Points per capacity unit.
    pub fn scale(&self) -> f32 {
        self.content_height() / self.capacity
    }
}
