//! Cache lines and sets.

/// Whether a line has ever been filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineState {
    /// Never filled during this run.
    #[default]
    Invalid,
    /// Holds the block with this tag.
    Valid(u64),
}

/// One way of a set: its state and the logical time of its last access.
///
/// A line moves from `Invalid` to `Valid` on its first fill and never goes back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    state: LineState,
    last_used: u64,
}

impl CacheLine {
    /// Current state of the line.
    #[inline(always)]
    pub const fn state(&self) -> LineState {
        self.state
    }

    /// Stored tag, if the line is valid.
    #[inline(always)]
    pub const fn tag(&self) -> Option<u64> {
        match self.state {
            LineState::Valid(tag) => Some(tag),
            LineState::Invalid => None,
        }
    }

    /// True once the line has been filled.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        matches!(self.state, LineState::Valid(_))
    }

    /// Logical time of the last access; 0 for a line that was never touched.
    #[inline(always)]
    pub const fn last_used(&self) -> u64 {
        self.last_used
    }

    #[inline(always)]
    pub(crate) const fn holds(&self, tag: u64) -> bool {
        matches!(self.state, LineState::Valid(t) if t == tag)
    }

    /// Stores `tag`, returning the tag it displaced (if any).
    pub(crate) const fn fill(&mut self, tag: u64) -> Option<u64> {
        let previous = self.tag();
        self.state = LineState::Valid(tag);
        previous
    }

    pub(crate) const fn touch(&mut self, stamp: u64) {
        self.last_used = stamp;
    }
}

/// An ordered group of `ways` lines sharing one set index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    pub(crate) fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
        }
    }

    /// Lines of this set in way order.
    #[inline(always)]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    pub(crate) fn lines_mut(&mut self) -> &mut [CacheLine] {
        &mut self.lines
    }

    /// Way holding `tag`, if present.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.holds(tag))
    }

    /// True if any line of the set holds `tag`.
    pub fn contains(&self, tag: u64) -> bool {
        self.find(tag).is_some()
    }

    /// Number of filled lines.
    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_valid()).count()
    }
}
