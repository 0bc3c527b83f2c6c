use std::collections::HashMap;
use std::path::Path;

use roxmltree::{Node, ParsingOptions};

use crate::error::Error;
use crate::measure::{ElementInfo, Measure};
use crate::model::{BlockKind, ContentBlock, Group, GroupId, GroupKind, Report, Section};

const PAGE_CLASS: &str = "pagebreak";
const NO_FOOTER_CLASS: &str = "no-footer";
const TABLE_CLASS: &str = "multi-page-table";
const COMMENT_CLASSES: [&str; 2] = ["multi-page-comment", "long-comment"];
const RESET_CLASS: &str = "reset-page";
const FOOTER_ID: &str = "footer-content";

fn classes<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = &'a str> {
    node.attribute("class").unwrap_or("").split_whitespace()
}

fn has_class(node: Node, class: &str) -> bool {
    classes(node).any(|c| c == class)
}

fn is_named(node: Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn is_table_group(node: Node) -> bool {
    is_named(node, "table") && has_class(node, TABLE_CLASS)
}

fn is_comment_group(node: Node) -> bool {
    COMMENT_CLASSES.iter().any(|c| has_class(node, c))
}

/// A measured wrapper around a splittable group is read through, not as a block.
fn holds_group(node: Node) -> bool {
    node.descendants()
        .skip(1)
        .any(|n| is_table_group(n) || is_comment_group(n))
}

/// Whitespace-collapsed text content of a subtree.
fn collapsed_text(node: Node) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cell texts of a table row joined with a column separator.
fn row_text(row: Node) -> String {
    element_children(row)
        .filter(|c| is_named(*c, "td") || is_named(*c, "th"))
        .map(collapsed_text)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn number_attr(node: Node, attr: &str) -> Result<Option<f32>, Error> {
    let Some(raw) = node.attribute(attr) else {
        return Ok(None);
    };
    let raw = raw.trim().trim_end_matches("px");
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(Error::InvalidReport(format!(
            "<{}> has invalid {attr}=\"{raw}\"",
            node.tag_name().name()
        ))),
    }
}

struct Reader<'m> {
    measure: &'m dyn Measure,
    groups: HashMap<GroupId, Group>,
    next_group: usize,
}

impl Reader<'_> {
    fn block(&self, node: Node, kind: BlockKind, text: String) -> Result<ContentBlock, Error> {
        let declared = number_attr(node, "data-height")?;
        let height = self.measure.height(&ElementInfo {
            tag: node.tag_name().name(),
            kind,
            text: &text,
            declared_height: declared,
        });
        let margin = number_attr(node, "data-margin-bottom")?.unwrap_or(0.0);
        let mut block = ContentBlock::new(kind, height)
            .with_text(text)
            .with_margin_bottom(margin.min(height));
        block.hard_reset = has_class(node, RESET_CLASS);
        Ok(block)
    }

    fn register_group(&mut self, node: Node, kind: GroupKind) -> GroupId {
        let fallback = match kind {
            GroupKind::Table => "table",
            GroupKind::Comment => "comment",
        };
        let mut id = match node.attribute("id") {
            Some(id) if !id.trim().is_empty() => GroupId::new(id.trim()),
            _ => GroupId::new(format!("{fallback}-{}", self.next_group)),
        };
        self.next_group += 1;
        if self.groups.contains_key(&id) {
            id = GroupId::new(format!("{id}-{}", self.next_group));
        }
        self.groups.insert(
            id.clone(),
            Group {
                id: id.clone(),
                kind,
                classes: classes(node).map(String::from).collect(),
            },
        );
        id
    }

    fn read_table(&mut self, table: Node, out: &mut Vec<ContentBlock>) -> Result<(), Error> {
        let id = self.register_group(table, GroupKind::Table);
        let mut header_rows = Vec::new();
        let mut body_rows = Vec::new();

        for child in element_children(table) {
            if is_named(child, "thead") {
                header_rows.extend(element_children(child).filter(|n| is_named(*n, "tr")));
            } else if is_named(child, "tbody") || is_named(child, "tfoot") {
                body_rows.extend(element_children(child).filter(|n| is_named(*n, "tr")));
            } else if is_named(child, "tr") {
                body_rows.push(child);
            }
        }

        // Several header rows repeat as one unit.
        if let Some(first) = header_rows.first() {
            let mut header = self.block(*first, BlockKind::TableHeader, row_text(*first))?;
            for extra in &header_rows[1..] {
                let more = self.block(*extra, BlockKind::TableHeader, row_text(*extra))?;
                header.rendered_height += more.rendered_height;
                header.text = format!("{} / {}", header.text, more.text);
            }
            out.push(header.in_group(id.as_str()));
        }
        for row in body_rows {
            out.push(self.block(row, BlockKind::TableRow, row_text(row))?.in_group(id.as_str()));
        }
        let rows = out.iter().filter(|b| b.group.as_ref() == Some(&id)).count();
        log::debug!("table {id}: {rows} rows");
        Ok(())
    }

    fn read_comment(&mut self, comment: Node, out: &mut Vec<ContentBlock>) -> Result<(), Error> {
        let id = self.register_group(comment, GroupKind::Comment);
        for child in element_children(comment) {
            let text = collapsed_text(child);
            if text.is_empty() && child.attribute("data-height").is_none() {
                continue;
            }
            out.push(self.block(child, BlockKind::Text, text)?.in_group(id.as_str()));
        }
        Ok(())
    }

    fn read_flow(&mut self, parent: Node, out: &mut Vec<ContentBlock>) -> Result<(), Error> {
        for node in element_children(parent) {
            let skipped = node.attribute("id") == Some(FOOTER_ID)
                || is_named(node, "script")
                || is_named(node, "style");
            if skipped {
                continue;
            }
            if is_table_group(node) {
                self.read_table(node, out)?;
            } else if is_comment_group(node) {
                self.read_comment(node, out)?;
            } else if holds_group(node) {
                if node.attribute("data-height").is_some() {
                    log::debug!("<{}> wraps a group, reading through", node.tag_name().name());
                }
                self.read_flow(node, out)?;
            } else if node.attribute("data-height").is_some() {
                out.push(self.block(node, BlockKind::Text, collapsed_text(node))?);
            } else if element_children(node).next().is_some() {
                self.read_flow(node, out)?;
            } else {
                let text = collapsed_text(node);
                // Empty leaves take no room.
                if !text.is_empty() {
                    out.push(self.block(node, BlockKind::Text, text)?);
                }
            }
        }
        Ok(())
    }
}

fn find_sections<'a, 'input>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    let mut sections = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if has_class(node, PAGE_CLASS) {
            sections.push(node);
            continue;
        }
        // Reverse so document order survives the stack.
        let mut children: Vec<_> = element_children(node).collect();
        children.reverse();
        stack.extend(children);
    }
    sections
}

fn body_or_root<'a, 'input>(root: Node<'a, 'input>) -> Node<'a, 'input> {
    root.descendants().find(|n| is_named(*n, "body")).unwrap_or(root)
}

pub fn parse_str(xml: &str, measure: &dyn Measure) -> Result<Report, Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options)?;
    let root = doc.root_element();

    let footer_template = root
        .descendants()
        .find(|n| n.attribute("id") == Some(FOOTER_ID))
        .map(collapsed_text)
        .filter(|t| !t.is_empty());

    let mut reader = Reader {
        measure,
        groups: HashMap::new(),
        next_group: 0,
    };

    let mut section_nodes = find_sections(root);
    if section_nodes.is_empty() {
        log::warn!("no .{PAGE_CLASS} container found, reading the whole document as one section");
        section_nodes.push(body_or_root(root));
    }

    let mut sections = Vec::with_capacity(section_nodes.len());
    for node in section_nodes {
        let mut blocks = Vec::new();
        reader.read_flow(node, &mut blocks)?;
        sections.push(Section {
            blocks,
            no_footer: has_class(node, NO_FOOTER_CLASS),
        });
    }

    let report = Report {
        sections,
        groups: reader.groups,
        footer_template,
    };
    log::info!(
        "report: {} sections, {} blocks, {} groups",
        report.sections.len(),
        report.block_count(),
        report.groups.len()
    );
    Ok(report)
}

pub fn parse(path: &Path, measure: &dyn Measure) -> Result<Report, Error> {
    let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_str(&xml, measure)
}
