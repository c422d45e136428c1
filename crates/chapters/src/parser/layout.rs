//! Positioned text extraction and reading-order line assembly.
//!
//! ```text
//! content ops  ->  RawSpan[]  ->  TextLine[]
//!   (per page)     extract        group_spans_into_lines
//! ```
//!
//! Within a line, adjacent raw spans that share a font and a rounded size are
//! merged, so each surviving span is a run of uniform font size.

use std::cmp::Ordering;

use super::backend::{decode_text_simple, BackendFontInfo, PageId, PdfBackend, PdfValue};
use crate::types::FontSize;
use crate::PdfError;

/// A run of text drawn at one position by a single show operator.
#[derive(Debug, Clone)]
pub struct RawSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

/// Spans sharing (approximately) one baseline, ordered left to right.
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    pub spans: Vec<RawSpan>,
    pub y: f32,
}

/// Baselines closer than this are the same line.
const Y_TOLERANCE: f32 = 1.0;

/// Glyph width as a fraction of font size when no metrics are available.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Gaps narrower than this (points) join spans without a space.
const MIN_WORD_GAP: f32 = 1.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Scripts written without inter-word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x3040..=0x30FF
            | 0xAC00..=0xD7AF
            | 0x3000..=0x303F
            | 0xFF00..=0xFFEF
            | 0x0E00..=0x0E7F
    )
}

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5] + self.text_rise
    }

    /// Rendered size: `font_size * sqrt(b^2 + d^2)` of the text matrix.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Td / TD / T*: translate the line matrix and reset the text matrix to it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    fn char_width(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    fn estimate_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width()
    }

    fn advance_after_show(&mut self, text: &str) {
        let dx: f32 = text
            .chars()
            .map(|ch| {
                let spacing = if ch == ' ' { self.word_spacing } else { 0.0 };
                self.char_width() + self.char_spacing + spacing
            })
            .sum();
        self.advance_x(dx);
    }

    fn span(&self, text: String, x: f32, y: f32) -> RawSpan {
        RawSpan {
            width: self.estimate_width(&text),
            text,
            x,
            y,
            font_size: self.effective_font_size(),
            font_name: self.font_name.clone(),
        }
    }
}

fn number(operands: &[PdfValue], index: usize) -> Option<f32> {
    operands.get(index).and_then(PdfValue::as_number)
}

struct PageWalker<'a> {
    backend: &'a dyn PdfBackend,
    page_id: PageId,
    fonts: Vec<BackendFontInfo>,
    state: TextState,
    spans: Vec<RawSpan>,
}

impl PageWalker<'_> {
    fn decode(&self, val: &PdfValue) -> String {
        match val {
            PdfValue::Str(bytes) => {
                let decoded = self
                    .backend
                    .decode_text(self.page_id, &self.state.font_key, bytes);
                if decoded.is_empty() {
                    decode_text_simple(bytes)
                } else {
                    decoded
                }
            }
            _ => String::new(),
        }
    }

    fn set_font(&mut self, operands: &[PdfValue]) {
        let key = match operands.first() {
            Some(PdfValue::Name(n)) | Some(PdfValue::Str(n)) => n.clone(),
            _ => return,
        };
        let size = number(operands, 1).unwrap_or(0.0);
        let name = self
            .fonts
            .iter()
            .find(|info| info.name == key)
            .and_then(|info| info.base_font.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&key).into_owned());

        self.state.font_key = key;
        self.state.font_name = name;
        self.state.font_size = size;
    }

    fn show(&mut self, operand: &PdfValue) {
        let text = self.decode(operand);
        if text.is_empty() {
            return;
        }
        let span = self.state.span(text, self.state.x(), self.state.y());
        self.state.advance_after_show(&span.text);
        self.spans.push(span);
    }

    /// TJ: strings interleaved with kerning adjustments in thousandths of a
    /// text-space unit. Large negative adjustments read as word gaps.
    fn show_array(&mut self, elements: &[PdfValue]) {
        let mut buf = String::new();
        let mut start_x = self.state.x();
        let start_y = self.state.y();

        for elem in elements {
            if let PdfValue::Str(_) = elem {
                let fragment = self.decode(elem);
                if buf.is_empty() {
                    start_x = self.state.x();
                }
                buf.push_str(&fragment);
                self.state.advance_after_show(&fragment);
            } else if let Some(adj) = elem.as_number() {
                let dx = -adj / 1000.0 * self.state.font_size * self.state.horiz_scale;
                if dx > self.state.char_width() * 0.3 && !buf.is_empty() {
                    buf.push(' ');
                }
                self.state.advance_x(dx);
            }
        }

        let text = buf.trim_end();
        if !text.is_empty() {
            let span = self.state.span(text.to_string(), start_x, start_y);
            self.spans.push(span);
        }
    }

    fn apply(&mut self, operator: &str, operands: &[PdfValue]) {
        match operator {
            "BT" => {
                self.state.text_matrix = IDENTITY_MATRIX;
                self.state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => self.set_font(operands),
            "Tm" => {
                let vals: Vec<f32> = operands.iter().filter_map(PdfValue::as_number).collect();
                if let &[a, b, c, d, e, f] = vals.as_slice() {
                    self.state.text_matrix = [a, b, c, d, e, f];
                    self.state.line_matrix = self.state.text_matrix;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    if operator == "TD" {
                        self.state.leading = -ty;
                    }
                    self.state.translate_line(tx, ty);
                }
            }
            "T*" => self.state.next_line(),
            "TL" => {
                if let Some(v) = number(operands, 0) {
                    self.state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(operands, 0) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(operands, 0) {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(operands, 0) {
                    self.state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number(operands, 0) {
                    self.state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(first) = operands.first() {
                    self.show(first);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = operands.first() {
                    self.show_array(arr);
                }
            }
            "'" => {
                self.state.next_line();
                if let Some(first) = operands.first() {
                    self.show(first);
                }
            }
            "\"" => {
                if let [aw, ac, text, ..] = operands {
                    if let Some(aw) = aw.as_number() {
                        self.state.word_spacing = aw;
                    }
                    if let Some(ac) = ac.as_number() {
                        self.state.char_spacing = ac;
                    }
                    self.state.next_line();
                    self.show(text);
                }
            }
            _ => {}
        }
    }
}

/// Walk one page's content stream and collect every shown string as a
/// positioned [`RawSpan`], in stream order.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<RawSpan>, PdfError> {
    let ops = backend.page_ops(page_id)?;
    let mut walker = PageWalker {
        backend,
        page_id,
        fonts: backend.page_fonts(page_id).unwrap_or_default(),
        state: TextState::default(),
        spans: Vec::new(),
    };

    for op in &ops {
        walker.apply(&op.operator, &op.operands);
    }

    Ok(walker.spans)
}

/// Group a page's raw spans into lines, top of the page first.
pub fn group_spans_into_lines(mut spans: Vec<RawSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<RawSpan> = Vec::new();

    for span in spans {
        if let Some(first) = current.first() {
            if (span.y - first.y).abs() > Y_TOLERANCE {
                lines.push(assemble_line(std::mem::take(&mut current)));
            }
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

fn same_run(prev: &RawSpan, next: &RawSpan) -> bool {
    prev.font_name == next.font_name
        && FontSize::from_points(prev.font_size) == FontSize::from_points(next.font_size)
}

/// Sort a line left to right and merge adjacent spans of the same run,
/// inserting a space across word-sized gaps.
fn assemble_line(mut spans: Vec<RawSpan>) -> TextLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let mut merged: Vec<RawSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(prev) = merged.last_mut() {
            let gap = span.x - (prev.x + prev.width);
            if same_run(prev, &span) && gap > -prev.font_size && gap < prev.font_size * 2.0 {
                if gap >= MIN_WORD_GAP && !boundary_is_spaceless(prev, &span) {
                    prev.text.push(' ');
                }
                prev.text.push_str(&span.text);
                prev.width = (span.x + span.width) - prev.x;
                continue;
            }
        }
        merged.push(span);
    }

    let y = merged.first().map(|s| s.y).unwrap_or(0.0);
    TextLine { spans: merged, y }
}

fn boundary_is_spaceless(prev: &RawSpan, next: &RawSpan) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(f)) => is_spaceless_script_char(l) && is_spaceless_script_char(f),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::backend::ContentOp;
    use super::*;

    fn make_span(text: &str, x: f32, y: f32, font_size: f32) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            x,
            y,
            width: text.chars().count() as f32 * font_size * APPROX_CHAR_WIDTH_RATIO,
            font_size,
            font_name: "Body".to_string(),
        }
    }

    struct MockBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
            Ok(vec![BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: Some("Times-Roman".to_string()),
            }])
        }

        fn page_ops(&self, _page: PageId) -> Result<Vec<ContentOp>, PdfError> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn name(n: &str) -> PdfValue {
        PdfValue::Name(n.as_bytes().to_vec())
    }

    fn text(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn spans_for(ops: Vec<ContentOp>) -> Vec<RawSpan> {
        let backend = MockBackend { ops };
        extract_page_spans(&backend, (1, 0)).unwrap()
    }

    #[test]
    fn tj_emits_span_with_font_and_position() {
        let spans = spans_for(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), PdfValue::Integer(18)]),
            ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ContentOp::new("Tj", vec![text("Chapter 1")]),
            ContentOp::new("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Chapter 1");
        assert_eq!(spans[0].font_name, "Times-Roman");
        assert!((spans[0].font_size - 18.0).abs() < 0.01);
        assert!((spans[0].x - 72.0).abs() < 0.01);
        assert!((spans[0].y - 700.0).abs() < 0.01);
    }

    #[test]
    fn text_matrix_scale_changes_effective_size() {
        let spans = spans_for(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), PdfValue::Integer(1)]),
            ContentOp::new(
                "Tm",
                vec![
                    PdfValue::Integer(12),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(12),
                    PdfValue::Integer(50),
                    PdfValue::Integer(500),
                ],
            ),
            ContentOp::new("Tj", vec![text("scaled")]),
            ContentOp::new("ET", vec![]),
        ]);

        assert!((spans[0].font_size - 12.0).abs() < 0.01);
    }

    #[test]
    fn tj_array_inserts_space_on_wide_kerning() {
        let spans = spans_for(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), PdfValue::Integer(10)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    text("Part"),
                    PdfValue::Integer(-400),
                    text("Two"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ]);

        assert_eq!(spans[0].text, "Part Two");
    }

    #[test]
    fn quote_operator_moves_to_next_line() {
        let spans = spans_for(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), PdfValue::Integer(10)]),
            ContentOp::new("TL", vec![PdfValue::Integer(14)]),
            ContentOp::new("Td", vec![PdfValue::Integer(0), PdfValue::Integer(700)]),
            ContentOp::new("Tj", vec![text("first")]),
            ContentOp::new("'", vec![text("second")]),
            ContentOp::new("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 2);
        assert!((spans[1].y - 686.0).abs() < 0.01);
    }

    #[test]
    fn group_orders_lines_top_to_bottom() {
        let lines = group_spans_into_lines(vec![
            make_span("Bottom", 0.0, 600.0, 10.0),
            make_span("Top", 0.0, 700.0, 10.0),
            make_span("Middle", 0.0, 650.0, 10.0),
        ]);

        let texts: Vec<&str> = lines.iter().map(|l| l.spans[0].text.as_str()).collect();
        assert_eq!(texts, vec!["Top", "Middle", "Bottom"]);
    }

    #[test]
    fn group_merges_adjacent_same_size_spans() {
        let lines = group_spans_into_lines(vec![
            make_span("World", 40.0, 700.0, 10.0),
            make_span("Hello", 0.0, 700.3, 10.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].text, "Hello World");
    }

    #[test]
    fn group_keeps_different_sizes_apart() {
        let lines = group_spans_into_lines(vec![
            make_span("1", 0.0, 700.0, 18.0),
            make_span("body", 10.0, 700.0, 10.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);
    }

    #[test]
    fn group_joins_cjk_without_space() {
        let lines = group_spans_into_lines(vec![
            make_span("第一", 0.0, 700.0, 10.0),
            make_span("章", 12.0, 700.0, 10.0),
        ]);

        assert_eq!(lines[0].spans[0].text, "第一章");
    }

    #[test]
    fn group_empty() {
        assert!(group_spans_into_lines(vec![]).is_empty());
    }
}
