//! Rebuild visual rows from positioned text on a PDF page.
//!
//! Statements usually draw every column cell as its own text object, so the
//! content stream order says little about rows. Each shown string becomes a
//! [`TextRun`] at its device-space origin; runs sharing a baseline are joined
//! left to right into one line, and lines are ordered top to bottom.

use anyhow::Result;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::debug;

/// Glyph advance (in em) assumed when the font carries no `Widths`.
const DEFAULT_GLYPH_WIDTH: f32 = 0.5;

/// A horizontal gap wider than this fraction of the font size separates words.
const WORD_GAP: f32 = 0.15;

/// Text drawn by one show operation
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Rendered font size
    pub size: f32,
    pub text: String,
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let v = floats(operands);
        if v.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: v[0],
            b: v[1],
            c: v[2],
            d: v[3],
            e: v[4],
            f: v[5],
        })
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

fn floats(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(|o| o.as_float().ok()).collect()
}

fn float_or_zero(obj: &Object) -> f32 {
    obj.as_float().unwrap_or(0.0)
}

/// Decoding and metrics for one page font resource
struct PageFont<'a> {
    encoding: Encoding<'a>,
    first_char: i64,
    widths: Vec<f32>,
}

impl<'a> PageFont<'a> {
    fn load(doc: &'a Document, font: &'a Dictionary) -> Result<Self> {
        let encoding = font.get_font_encoding(doc)?;
        let first_char = font.get(b"FirstChar").and_then(Object::as_i64).unwrap_or(0);
        let widths = font
            .get_deref(b"Widths", doc)
            .and_then(Object::as_array)
            .map(|arr| arr.iter().map(float_or_zero).collect())
            .unwrap_or_default();
        Ok(Self {
            encoding,
            first_char,
            widths,
        })
    }

    /// Advance of `bytes` in em
    fn advance(&self, bytes: &[u8], decoded: &str) -> f32 {
        let one_byte = matches!(
            self.encoding,
            Encoding::OneByteEncoding(_) | Encoding::SimpleEncoding(_)
        );
        if !one_byte || self.widths.is_empty() {
            return decoded.chars().count() as f32 * DEFAULT_GLYPH_WIDTH;
        }
        bytes
            .iter()
            .map(|&code| {
                usize::try_from(i64::from(code) - self.first_char)
                    .ok()
                    .and_then(|i| self.widths.get(i))
                    .filter(|w| **w > 0.0)
                    .map(|w| w / 1000.0)
                    .unwrap_or(DEFAULT_GLYPH_WIDTH)
            })
            .sum()
    }
}

/// Graphics and text state while walking a content stream
struct TextCursor<'d, 'f> {
    fonts: &'f BTreeMap<Vec<u8>, PageFont<'d>>,
    ctm: Matrix,
    saved_ctm: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    font: Option<&'f PageFont<'d>>,
    font_size: f32,
    runs: Vec<TextRun>,
}

impl<'d, 'f> TextCursor<'d, 'f> {
    fn new(fonts: &'f BTreeMap<Vec<u8>, PageFont<'d>>) -> Self {
        Self {
            fonts,
            ctm: Matrix::IDENTITY,
            saved_ctm: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            leading: 0.0,
            font: None,
            font_size: 0.0,
            runs: Vec::new(),
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translate(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.saved_ctm.push(self.ctm),
            "Q" => self.ctm = self.saved_ctm.pop().unwrap_or(Matrix::IDENTITY),
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "Tf" => {
                let fonts = self.fonts;
                self.font = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| fonts.get(name));
                self.font_size = operands.get(1).map_or(0.0, float_or_zero);
            }
            "TL" => {
                if let [leading] = floats(operands).as_slice() {
                    self.leading = *leading;
                }
            }
            "Td" => {
                if let [tx, ty] = floats(operands).as_slice() {
                    self.move_line(*tx, *ty);
                }
            }
            "TD" => {
                if let [tx, ty] = floats(operands).as_slice() {
                    self.leading = -*ty;
                    self.move_line(*tx, *ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => self.show(operands),
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                self.show(operands);
            }
            "\"" => {
                self.next_line();
                self.show(operands.get(2..).unwrap_or_default());
            }
            _ => {}
        }
    }

    /// Show strings (and `TJ` kerning numbers) as a single run.
    fn show(&mut self, items: &[Object]) {
        let Some(font) = self.font else {
            debug!("text shown without a font; skipped");
            return;
        };
        let start = self.tm.then(&self.ctm);
        let mut text = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = match Document::decode_text(&font.encoding, bytes) {
                        Ok(s) => s,
                        Err(err) => {
                            debug!(error = %err, "undecodable text skipped");
                            continue;
                        }
                    };
                    let advance = font.advance(bytes, &decoded) * self.font_size;
                    text.push_str(&decoded);
                    self.tm = Matrix::translate(advance, 0.0).then(&self.tm);
                }
                other => {
                    let Ok(adjust) = other.as_float() else {
                        continue;
                    };
                    let shift = -adjust / 1000.0;
                    if shift > WORD_GAP && !text.ends_with(' ') {
                        text.push(' ');
                    }
                    self.tm = Matrix::translate(shift * self.font_size, 0.0).then(&self.tm);
                }
            }
        }

        if text.trim().is_empty() {
            return;
        }
        let end = self.tm.then(&self.ctm);
        self.runs.push(TextRun {
            x: start.e,
            y: start.f,
            width: end.e - start.e,
            size: self.font_size * start.vertical_scale(),
            text,
        });
    }
}

/// Positioned text runs of one page, in content-stream order.
pub fn page_runs(doc: &Document, page_id: ObjectId) -> Result<Vec<TextRun>> {
    let fonts = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| PageFont::load(doc, font).map(|f| (name, f)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let mut cursor = TextCursor::new(&fonts);
    for op in &content.operations {
        cursor.apply(&op.operator, &op.operands);
    }
    Ok(cursor.runs)
}

fn same_row(anchor: &TextRun, run: &TextRun) -> bool {
    let tolerance = (anchor.size.min(run.size) * 0.5).max(1.0);
    (anchor.y - run.y).abs() <= tolerance
}

fn join_row(mut row: Vec<TextRun>) -> String {
    row.sort_by(|a, b| a.x.total_cmp(&b.x));
    let mut line = String::new();
    let mut prev_end: Option<f32> = None;

    for run in row {
        if let Some(end) = prev_end {
            let separated = run.x - end > run.size * WORD_GAP;
            if separated && !line.ends_with(' ') && !run.text.starts_with(' ') {
                line.push(' ');
            }
        }
        line.push_str(&run.text);
        let run_end = run.x + run.width;
        prev_end = Some(prev_end.map_or(run_end, |e| e.max(run_end)));
    }

    line.trim().to_string()
}

/// Group runs sharing a baseline into lines, top of the page first.
pub fn rows(mut runs: Vec<TextRun>) -> Vec<String> {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut grouped: Vec<Vec<TextRun>> = Vec::new();
    for run in runs {
        match grouped.last_mut() {
            Some(row) if same_row(&row[0], &run) => row.push(run),
            _ => grouped.push(vec![run]),
        }
    }

    grouped.into_iter().map(join_row).collect()
}
