//! Byte spans and line/column lookup.

use text_size::TextSize;

/// A half-open byte range `[start, end)` into a component source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: TextSize,
    /// The end byte offset (exclusive).
    pub end: TextSize,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<TextSize>, end: impl Into<TextSize>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<TextSize>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Creates a span from `usize` offsets as produced by string scanning.
    #[inline]
    pub(crate) fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(TextSize::from(start as u32), TextSize::from(end as u32))
    }

    /// Returns this span moved right by `offset` bytes.
    #[inline]
    pub fn shifted(self, offset: TextSize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Returns true if this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` covered by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let start = u32::from(self.start) as usize;
        let end = u32::from(self.end) as usize;
        source.get(start..end).unwrap_or("")
    }
}

/// A 1-based line and column position, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column (in characters).
    pub col: u32,
}

impl LineCol {
    /// Computes the position of `offset` in `source`.
    ///
    /// Offsets past the end of the source clamp to the last position.
    pub fn of(source: &str, offset: TextSize) -> Self {
        let offset = (u32::from(offset) as usize).min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = before[line_start..].chars().count() as u32 + 1;
        Self { line, col }
    }
}
