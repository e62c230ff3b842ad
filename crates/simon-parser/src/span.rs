//! Source positions.

use std::ops::Range;

/// A byte range in a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

/// A value with the span of the source it was read from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spanned<T> {
    value: T,
    span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Get a reference to the underlying value
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and return just the inner value
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Transform the value, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

/// Maps byte offsets to 1-based line and column numbers.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Line and column of `offset`, both starting at 1.
    ///
    /// ```
    /// use simon_parser::LineIndex;
    ///
    /// let index = LineIndex::new("language UI\nApplication app {}");
    /// assert_eq!(index.line_col(0), (1, 1));
    /// assert_eq!(index.line_col(12), (2, 1));
    /// assert_eq!(index.line_col(24), (2, 13));
    /// ```
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |text| text.chars().count());
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_union() {
        let a = Span::new(4..8);
        let b = Span::new(2..5);
        assert_eq!(a.union(b), Span::new(2..8));
        assert_eq!(a.len(), 4);
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_spanned_map() {
        let spanned = Spanned::new("screen", Span::new(3..9));
        let mapped = spanned.map(str::len);
        assert_eq!(*mapped.inner(), 6);
        assert_eq!(mapped.span(), Span::new(3..9));
    }

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("a\nbc\n\ndé x");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(1), (1, 2));
        assert_eq!(index.line_col(2), (2, 1));
        assert_eq!(index.line_col(4), (2, 3));
        assert_eq!(index.line_col(5), (3, 1));
        assert_eq!(index.line_col(6), (4, 1));
        // `é` is two bytes but one column.
        assert_eq!(index.line_col(9), (4, 3));
        assert_eq!(index.line_col(100), (4, 5));
    }
}
