//! Stack of currently open marks.

use smallvec::SmallVec;

use crate::limits;
use crate::node::{Mark, MarkType};

/// One opener seen in the run.
#[derive(Debug)]
struct Opener {
    mark_type: MarkType,
    /// `None` when the mark was not applied (depth limit, link without href).
    mark: Option<Mark>,
}

/// Openers in nesting order, outermost first.
///
/// Suppressed openers keep their place in the sequence so a closer always
/// pairs with the innermost opener of its type, applied or not.
#[derive(Debug, Default)]
pub struct MarkStack {
    openers: SmallVec<[Opener; 4]>,
    applied: usize,
}

impl MarkStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a mark. Returns false if it was suppressed by the depth limit.
    pub fn push(&mut self, mark: Mark) -> bool {
        let mark_type = mark.mark_type();
        if self.applied >= limits::MAX_INLINE_NESTING {
            self.openers.push(Opener {
                mark_type,
                mark: None,
            });
            return false;
        }
        self.openers.push(Opener {
            mark_type,
            mark: Some(mark),
        });
        self.applied += 1;
        true
    }

    /// Record an opener whose mark is omitted.
    pub fn suppress(&mut self, mark_type: MarkType) {
        self.openers.push(Opener {
            mark_type,
            mark: None,
        });
    }

    /// Close the innermost opener of `mark_type`.
    ///
    /// Not necessarily the top of the stack: openers are filtered by type so
    /// interleaved closers still remove the right entry. A closer with no
    /// opener of its type is ignored.
    pub fn close(&mut self, mark_type: MarkType) {
        let Some(idx) = self.openers.iter().rposition(|o| o.mark_type == mark_type) else {
            return;
        };
        if self.openers.remove(idx).mark.is_some() {
            self.applied -= 1;
        }
    }

    /// Whether no mark is applied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.applied == 0
    }

    /// Number of applied marks.
    #[inline]
    pub fn len(&self) -> usize {
        self.applied
    }

    fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.openers.iter().filter_map(|o| o.mark.as_ref())
    }

    /// Copy of the applied marks for a new text node.
    pub fn snapshot(&self) -> Vec<Mark> {
        self.marks().cloned().collect()
    }

    /// Whether the applied marks equal `marks`.
    pub fn matches(&self, marks: &[Mark]) -> bool {
        self.marks().eq(marks.iter())
    }
}
