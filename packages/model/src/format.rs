//! # Inline formats
//!
//! Character-range formatting stored on text-bearing blocks.
//!
//! A block's `data.formats` holds a list of [`FormatSpan`]s over the
//! characters of `data.text`. Offsets count `char`s, `end` is exclusive.
//! Spans of different formats may overlap freely; spans of the identical
//! format are kept disjoint and non-adjacent.

use crate::BlockData;
use serde::{Deserialize, Serialize};
use std::mem::discriminant;
use std::ops::Range;

/// Payload key holding the span list
pub const FORMATS_KEY: &str = "formats";

/// Payload key holding the formatted text
pub const TEXT_KEY: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Link { href: String },
}

impl InlineFormat {
    /// Same variant, ignoring attributes such as a link's href
    pub fn same_kind(&self, other: &InlineFormat) -> bool {
        discriminant(self) == discriminant(other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpan {
    pub start: usize,
    pub end: usize,
    pub format: InlineFormat,
}

impl FormatSpan {
    pub fn new(range: Range<usize>, format: InlineFormat) -> Self {
        Self {
            start: range.start,
            end: range.end,
            format,
        }
    }

    fn touches(&self, start: usize, end: usize) -> bool {
        self.start <= end && self.end >= start
    }
}

/// Apply `format` over `range`
///
/// Existing coverage of the same kind inside the range is replaced, so a link
/// with a new href overwrites the old one. The result is merged with any
/// overlapping or adjacent span of the identical format.
pub fn apply_format(
    spans: &[FormatSpan],
    range: Range<usize>,
    format: &InlineFormat,
) -> Vec<FormatSpan> {
    let mut out = remove_format(spans, range.clone(), format);
    let mut merged = FormatSpan::new(range, format.clone());

    loop {
        let before = out.len();
        out.retain(|span| {
            if span.format == merged.format && span.touches(merged.start, merged.end) {
                merged.start = merged.start.min(span.start);
                merged.end = merged.end.max(span.end);
                false
            } else {
                true
            }
        });
        if out.len() == before {
            break;
        }
    }

    out.push(merged);
    sort_spans(&mut out);
    out
}

/// Remove every format of `format`'s kind from `range`, splitting spans
pub fn remove_format(
    spans: &[FormatSpan],
    range: Range<usize>,
    format: &InlineFormat,
) -> Vec<FormatSpan> {
    let mut out = Vec::with_capacity(spans.len() + 1);

    for span in spans {
        let overlaps = span.start < range.end && span.end > range.start;
        if !span.format.same_kind(format) || !overlaps {
            out.push(span.clone());
            continue;
        }

        if span.start < range.start {
            out.push(FormatSpan::new(span.start..range.start, span.format.clone()));
        }
        if span.end > range.end {
            out.push(FormatSpan::new(range.end..span.end, span.format.clone()));
        }
    }

    sort_spans(&mut out);
    out
}

/// Formats active at a character offset
pub fn formats_at(spans: &[FormatSpan], offset: usize) -> Vec<&InlineFormat> {
    spans
        .iter()
        .filter(|span| span.start <= offset && offset < span.end)
        .map(|span| &span.format)
        .collect()
}

/// Read the span list from a payload (missing key means no formats)
pub fn read_spans(data: &BlockData) -> Result<Vec<FormatSpan>, serde_json::Error> {
    match data.get(FORMATS_KEY) {
        Some(value) => serde_json::from_value(value.clone()),
        None => Ok(Vec::new()),
    }
}

/// Character length of the payload's text, if it has one
pub fn text_len(data: &BlockData) -> Option<usize> {
    data.get(TEXT_KEY)
        .and_then(|value| value.as_str())
        .map(|text| text.chars().count())
}

fn sort_spans(spans: &mut [FormatSpan]) {
    spans.sort_by_key(|span| (span.start, span.end));
}
