use crate::fonts::wrap_text;
use crate::model::BlockKind;

/// What the report reader knows about an element when it needs a height.
pub struct ElementInfo<'a> {
    pub tag: &'a str,
    pub kind: BlockKind,
    pub text: &'a str,
    /// Height measured by the browser (`data-height`), in capacity units.
    pub declared_height: Option<f32>,
}

/// Supplies the rendered height of an element, in capacity units.
pub trait Measure {
    fn height(&self, element: &ElementInfo) -> f32;
}

/// Estimates heights from text metrics: Helvetica widths, greedy word wrap,
/// a fixed line pitch.
#[derive(Clone, Copy, Debug)]
pub struct TextMetrics {
    pub font_size: f32,     // points
    pub line_height: f32,   // multiplier of font_size
    pub content_width: f32, // points
    pub units_per_point: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        // A4 content box (515pt wide, 722pt tall) mapped onto a 1000-unit capacity.
        Self {
            font_size: 10.0,
            line_height: 1.2,
            content_width: 515.0,
            units_per_point: 1000.0 / 722.0,
        }
    }
}

impl TextMetrics {
    pub fn line_count(&self, text: &str) -> usize {
        wrap_text(text, self.font_size, self.content_width).len()
    }

    fn line_pitch(&self) -> f32 {
        self.font_size * self.line_height * self.units_per_point
    }
}

impl Measure for TextMetrics {
    fn height(&self, element: &ElementInfo) -> f32 {
        let lines = self.line_count(element.text);
        let lines = match element.kind {
            // Table rows keep their height even when every cell is empty.
            BlockKind::TableRow | BlockKind::TableHeader => lines.max(1),
            BlockKind::Text => lines,
        };
        lines as f32 * self.line_pitch()
    }
}

/// Uses the browser measurement when present, falling back to an estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclaredHeights {
    pub fallback: TextMetrics,
}

impl Measure for DeclaredHeights {
    fn height(&self, element: &ElementInfo) -> f32 {
        match element.declared_height {
            Some(h) => h,
            None => {
                let estimate = self.fallback.height(element);
                log::warn!(
                    "<{}> has no data-height, estimated {:.1} units from text",
                    element.tag,
                    estimate
                );
                estimate
            }
        }
    }
}
