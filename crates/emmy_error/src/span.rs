//! Byte spans into raw command input.

/// Half-open byte range `start..end` of a token within the raw input.
///
/// # Examples
///
/// ```
/// use emmy_error::TokenSpan;
///
/// let input = "tp PlayerA";
/// let span = TokenSpan::new(3, 10);
/// assert_eq!(span.slice(input), Some("PlayerA"));
/// assert_eq!(format!("{}", span), "3..10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
#[display("{}..{}", start, end)]
pub struct TokenSpan {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl TokenSpan {
    /// Create a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: TokenSpan) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice `input` with this span, if it lies within bounds.
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start..self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_covers_both() {
        let joined = TokenSpan::new(4, 6).join(TokenSpan::new(0, 2));
        assert_eq!(joined, TokenSpan::new(0, 6));
        assert_eq!(joined.len(), 6);
    }

    #[test]
    fn test_slice_out_of_bounds() {
        assert_eq!(TokenSpan::new(2, 40).slice("short"), None);
        assert!(TokenSpan::new(3, 3).is_empty());
    }
}
