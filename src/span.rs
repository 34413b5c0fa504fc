use std::fmt;

/// A view of the unconsumed part of a caller-owned input buffer.
///
/// A span is either *valid* (it has a cursor, and `cursor..limit` is the
/// input still to be matched) or *failed*. A failed span has no cursor,
/// and its limit records the offset where the failure was detected.
/// Every matcher takes a valid span and returns either a valid span whose
/// cursor moved forward (limit unchanged) or a failed one, so failure is
/// an ordinary value and never allocates.
///
/// The atoms consumed by a successful step are
/// `source[old.cursor()..new.cursor()]`.
pub struct Span<'i, A> {
    source: &'i [A],
    cursor: Option<usize>,
    limit: usize,
}

impl<A> Clone for Span<'_, A> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Span<'_, A> {}

impl<'i, A> Span<'i, A> {
    /// A span covering the whole of `source`.
    #[inline]
    pub fn new(source: &'i [A]) -> Self {
        Self {
            source,
            cursor: Some(0),
            limit: source.len(),
        }
    }

    /// A span covering `source[cursor..limit]`.
    ///
    /// Offsets stay relative to the start of `source`, so failure
    /// positions and captured ranges are always absolute.
    ///
    /// # Panics
    ///
    /// Panics unless `cursor <= limit <= source.len()`.
    pub fn between(source: &'i [A], cursor: usize, limit: usize) -> Self {
        assert!(
            cursor <= limit && limit <= source.len(),
            "span bounds {cursor}..{limit} outside input of length {}",
            source.len()
        );
        Self {
            source,
            cursor: Some(cursor),
            limit,
        }
    }

    /// The whole input buffer this span points into.
    #[inline]
    pub fn source(&self) -> &'i [A] {
        self.source
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.cursor.is_some()
    }

    /// True for a valid span with nothing left to match.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == Some(self.limit)
    }

    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The offset where matching failed, or `None` for a valid span.
    #[inline]
    pub fn failure(&self) -> Option<usize> {
        match self.cursor {
            Some(_) => None,
            None => Some(self.limit),
        }
    }

    /// The cursor of a valid span, or the failure offset of a failed one.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.unwrap_or(self.limit)
    }

    /// Fail at the current cursor. A failed span is returned unchanged.
    #[inline]
    pub fn fail(self) -> Self {
        match self.cursor {
            Some(at) => self.fail_at(at),
            None => self,
        }
    }

    /// Fail at an explicit offset.
    ///
    /// # Panics
    ///
    /// Panics if `at` lies outside the input buffer.
    #[inline]
    pub fn fail_at(self, at: usize) -> Self {
        assert!(
            at <= self.source.len(),
            "failure offset {at} outside input of length {}",
            self.source.len()
        );
        Self {
            source: self.source,
            cursor: None,
            limit: at,
        }
    }

    /// Of two failures, the one detected further into the input.
    /// Ties keep `self`.
    #[inline]
    pub fn furthest(self, other: Self) -> Self {
        if other.position() > self.position() {
            other
        } else {
            self
        }
    }

    /// The next atom, if the span is valid and not empty.
    #[inline]
    pub fn peek(&self) -> Option<&'i A> {
        match self.cursor {
            Some(at) if at < self.limit => self.source.get(at),
            _ => None,
        }
    }

    /// Move the cursor forward by `n` atoms.
    ///
    /// # Panics
    ///
    /// Panics on a failed span or when fewer than `n` atoms remain.
    #[inline]
    pub fn advance(self, n: usize) -> Self {
        let at = match self.cursor {
            Some(at) => at,
            None => panic!("advance on a failed span"),
        };
        assert!(
            n <= self.limit - at,
            "advance by {n} past limit {} from {at}",
            self.limit
        );
        Self {
            source: self.source,
            cursor: Some(at + n),
            limit: self.limit,
        }
    }

    /// The atoms still to be matched; empty for a failed span.
    #[inline]
    pub fn remaining(&self) -> &'i [A] {
        match self.cursor {
            Some(at) => &self.source[at..self.limit],
            None => &[],
        }
    }

    /// The atoms consumed between `start` and `self`.
    ///
    /// Both spans must be valid and point into the same buffer.
    pub fn consumed_since(&self, start: Span<'i, A>) -> &'i [A] {
        match (start.cursor, self.cursor) {
            (Some(from), Some(to)) if from <= to => &self.source[from..to],
            _ => &[],
        }
    }
}

impl<'i> From<&'i str> for Span<'i, u8> {
    fn from(text: &'i str) -> Self {
        Span::new(text.as_bytes())
    }
}

impl<A> fmt::Debug for Span<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cursor {
            Some(at) => write!(f, "Span({at}..{})", self.limit),
            None => write!(f, "Span(failed at {})", self.limit),
        }
    }
}
