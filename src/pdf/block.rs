use pdf_writer::{Content, Name, Str};

use crate::fonts::{BODY_FONT, to_winansi_bytes, wrap_text};
use crate::model::{BlockKind, PlacedBlock};

const BLOCK_FONT_SIZE: f32 = 7.5;
const FOOTER_FONT_SIZE: f32 = 6.0;
const TEXT_INSET: f32 = 3.0;

fn show_lines(
    content: &mut Content,
    lines: &[String],
    x: f32,
    first_baseline: f32,
    font_size: f32,
) {
    if lines.is_empty() {
        return;
    }
    let pitch = font_size * 1.2;
    content.begin_text();
    content.set_font(Name(BODY_FONT), font_size);
    content.next_line(x, first_baseline);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.next_line(0.0, -pitch);
        }
        content.show(Str(&to_winansi_bytes(line)));
    }
    content.end_text();
}

/// Draw one placed block as a box of its measured height with as many text
/// lines as fit inside it.
pub(super) fn render_block(
    content: &mut Content,
    placed: &PlacedBlock,
    x: f32,
    top: f32,
    width: f32,
    height: f32,
) {
    let block = &placed.block;
    let bottom = top - height;

    match block.kind {
        BlockKind::TableHeader => {
            content.save_state();
            let gray = if placed.repeated { 0.93 } else { 0.88 };
            content.set_fill_gray(gray);
            content.rect(x, bottom, width, height).fill_nonzero();
            content.restore_state();
        }
        BlockKind::TableRow => {
            content.save_state();
            content.set_line_width(0.4);
            content.set_stroke_gray(0.6);
            content.move_to(x, bottom);
            content.line_to(x + width, bottom);
            content.stroke();
            content.restore_state();
        }
        BlockKind::Text => {
            if block.group.is_some() {
                content.save_state();
                content.set_line_width(0.6);
                content.set_stroke_gray(0.75);
                content.move_to(x, top);
                content.line_to(x, bottom);
                content.stroke();
                content.restore_state();
            }
        }
    }

    let pitch = BLOCK_FONT_SIZE * 1.2;
    let fitting = ((height - TEXT_INSET) / pitch).floor().max(0.0) as usize;
    if fitting == 0 || block.text.is_empty() {
        return;
    }
    let mut lines = wrap_text(&block.text, BLOCK_FONT_SIZE, width - 2.0 * TEXT_INSET);
    if lines.len() > fitting {
        lines.truncate(fitting);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    show_lines(
        content,
        &lines,
        x + TEXT_INSET,
        top - TEXT_INSET - BLOCK_FONT_SIZE * 0.75,
        BLOCK_FONT_SIZE,
    );
}

pub(super) fn render_footer(content: &mut Content, text: &str, x: f32, top: f32, width: f32) {
    content.save_state();
    content.set_line_width(0.3);
    content.set_stroke_gray(0.5);
    content.move_to(x, top);
    content.line_to(x + width, top);
    content.stroke();
    content.restore_state();

    let lines = wrap_text(text, FOOTER_FONT_SIZE, width);
    show_lines(
        content,
        &lines,
        x,
        top - 4.0 - FOOTER_FONT_SIZE * 0.75,
        FOOTER_FONT_SIZE,
    );
}
