//! The run-length list (spec §4.2): an ordered sequence of typed, leveled
//! spans bracketed by SOT/EOT sentinels.
//!
//! The reference implementation this crate is grounded on keeps this as a
//! doubly linked list of pool-allocated nodes. That pooling is a pure
//! performance knob (spec §9), so here it is a plain `Vec<Run>` with the
//! sentinels as real (zero-length) entries at front and back — simpler to
//! reason about, and it sidesteps the freed-twice bug the original's less
//! careful `free_rl_list` copy has, just by construction.

use crate::types::{BidiClass, RawLevel, LEVEL_END, LEVEL_START};

/// One span: `[pos, pos + len)` of the input, all sharing `typ` and `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub pos: usize,
    pub len: usize,
    pub typ: BidiClass,
    pub level: RawLevel,
}

impl Run {
    fn sentinel(typ: BidiClass, pos: usize, level: RawLevel) -> Self {
        Run { pos, len: 0, typ, level }
    }

    pub fn end(&self) -> usize {
        self.pos + self.len
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.typ, BidiClass::SOT | BidiClass::EOT)
    }
}

/// A run list: `[SOT, .. non-sentinel spans in order .., EOT]`.
#[derive(Debug, Clone)]
pub struct RunList {
    pub runs: Vec<Run>,
}

impl RunList {
    /// Build an empty, sentinel-only list for an input of length `n`.
    pub fn empty(n: usize) -> Self {
        RunList {
            runs: vec![
                Run::sentinel(BidiClass::SOT, 0, LEVEL_START),
                Run::sentinel(BidiClass::EOT, n, LEVEL_END),
            ],
        }
    }

    /// `from_types`: maximal equal-type runs, bracketed by SOT/EOT.
    pub fn from_types(types: &[BidiClass]) -> Self {
        let n = types.len();
        let mut runs = Vec::with_capacity(types.len() / 2 + 2);
        runs.push(Run::sentinel(BidiClass::SOT, 0, LEVEL_START));
        let mut i = 0;
        while i < n {
            let typ = types[i];
            let start = i;
            while i < n && types[i] == typ {
                i += 1;
            }
            runs.push(Run { pos: start, len: i - start, typ, level: 0 });
        }
        runs.push(Run::sentinel(BidiClass::EOT, n, LEVEL_END));
        RunList { runs }
    }

    pub fn len_input(&self) -> usize {
        self.runs.last().map(|r| r.pos).unwrap_or(0)
    }

    /// Index range of the non-sentinel runs: `1..runs.len()-1`.
    pub fn body_range(&self) -> std::ops::Range<usize> {
        1..self.runs.len().saturating_sub(1)
    }

    pub fn non_sentinels(&self) -> impl Iterator<Item = &Run> {
        self.runs[self.body_range()].iter()
    }

    /// Merge adjacent non-sentinel runs sharing `(type, level)`.
    pub fn compact_equal(&mut self) {
        self.compact_by(|a, b| a.typ == b.typ && a.level == b.level);
    }

    /// Merge adjacent non-sentinel runs sharing `level`, when either their
    /// types are equal or both are neutral.
    pub fn compact_neutral(&mut self) {
        self.compact_by(|a, b| a.level == b.level && (a.typ == b.typ || (a.typ.is_neutral() && b.typ.is_neutral())));
    }

    fn compact_by(&mut self, mergeable: impl Fn(&Run, &Run) -> bool) {
        let mut out: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.is_sentinel() {
                out.push(run);
                continue;
            }
            if let Some(last) = out.last_mut() {
                if !last.is_sentinel() && mergeable(last, &run) {
                    last.len += run.len;
                    continue;
                }
            }
            out.push(run);
        }
        self.runs = out;
    }

    /// Detach the run at `idx` (must be a non-sentinel index) from `self`
    /// and append it immediately before `into`'s EOT sentinel, preserving
    /// its original `pos`/`typ` and overwriting its level.
    pub fn remove_and_append(&mut self, idx: usize, level: RawLevel, into: &mut RunList) {
        let mut run = self.runs.remove(idx);
        run.level = level;
        let eot = into.runs.len() - 1;
        into.runs.insert(eot, run);
    }

    /// Splice `overlay` into `self` (spec §4.2 `merge`). Both lists share
    /// `self`'s coordinate system. Overlay spans are applied left to right;
    /// each one truncates/splits whatever it overlaps in `self` and becomes
    /// authoritative over that range. Overlay spans with `len == 0` or
    /// `pos` behind the running cursor are dropped.
    pub fn merge(&mut self, overlay: &RunList) {
        let mut cursor = 0usize;
        for o in overlay.non_sentinels() {
            if o.len == 0 || o.pos < cursor {
                continue;
            }
            self.splice_range(o.pos, o.end(), Run { pos: o.pos, len: o.len, typ: o.typ, level: o.level });
            cursor = o.end();
        }
    }

    /// Replace whatever covers `[start, end)` among the non-sentinel runs
    /// with exactly `replacement`, splitting partially-overlapped runs at
    /// the boundary.
    fn splice_range(&mut self, start: usize, end: usize, replacement: Run) {
        let range = self.body_range();
        // Find first run touching `start` and last run touching `end - 1`.
        let mut first = None;
        let mut last = None;
        for i in range.clone() {
            let r = self.runs[i];
            if r.pos < end && r.end() > start {
                if first.is_none() {
                    first = Some(i);
                }
                last = Some(i);
            }
        }
        let (first, last) = match (first, last) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                // No overlap: insert in place, keeping order by pos.
                let insert_at = range.clone().find(|&i| self.runs[i].pos >= end).unwrap_or(range.end);
                self.runs.insert(insert_at, replacement);
                return;
            }
        };

        let mut replacement_block = Vec::with_capacity(3);
        let first_run = self.runs[first];
        if first_run.pos < start {
            replacement_block.push(Run { pos: first_run.pos, len: start - first_run.pos, typ: first_run.typ, level: first_run.level });
        }
        replacement_block.push(replacement);
        let last_run = self.runs[last];
        if last_run.end() > end {
            replacement_block.push(Run { pos: end, len: last_run.end() - end, typ: last_run.typ, level: last_run.level });
        }

        self.runs.splice(first..=last, replacement_block);
    }

    pub fn types(&self) -> Vec<BidiClass> {
        let n = self.len_input();
        let mut out = vec![BidiClass::ON; n];
        for r in self.non_sentinels() {
            for t in out[r.pos..r.end()].iter_mut() {
                *t = r.typ;
            }
        }
        out
    }

    pub fn levels(&self) -> Vec<RawLevel> {
        let n = self.len_input();
        let mut out = vec![0; n];
        for r in self.non_sentinels() {
            for l in out[r.pos..r.end()].iter_mut() {
                *l = r.level;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(spans: &[(usize, usize, BidiClass, RawLevel)]) -> RunList {
        let mut runs = vec![Run::sentinel(BidiClass::SOT, 0, LEVEL_START)];
        let mut end = 0;
        for &(pos, len, typ, level) in spans {
            runs.push(Run { pos, len, typ, level });
            end = pos + len;
        }
        runs.push(Run::sentinel(BidiClass::EOT, end, LEVEL_END));
        RunList { runs }
    }

    #[test]
    fn from_types_builds_maximal_runs() {
        let types = [BidiClass::L, BidiClass::L, BidiClass::R, BidiClass::EN];
        let list = RunList::from_types(&types);
        assert_eq!(list.runs.len(), 5); // SOT + 3 runs + EOT
        assert_eq!(list.runs[1], Run { pos: 0, len: 2, typ: BidiClass::L, level: 0 });
        assert_eq!(list.runs[2], Run { pos: 2, len: 1, typ: BidiClass::R, level: 0 });
        assert_eq!(list.runs[3], Run { pos: 3, len: 1, typ: BidiClass::EN, level: 0 });
    }

    #[test]
    fn compact_equal_merges_same_type_and_level() {
        let mut l = list(&[(0, 2, BidiClass::L, 0), (2, 3, BidiClass::L, 0), (5, 1, BidiClass::R, 0)]);
        l.compact_equal();
        assert_eq!(l.non_sentinels().count(), 2);
        assert_eq!(l.runs[1].len, 5);
    }

    #[test]
    fn compact_neutral_merges_distinct_neutral_types() {
        let mut l = list(&[(0, 1, BidiClass::WS, 0), (1, 1, BidiClass::ON, 0), (2, 1, BidiClass::L, 0)]);
        l.compact_neutral();
        assert_eq!(l.non_sentinels().count(), 2);
        assert_eq!(l.runs[1].len, 2);
    }

    #[test]
    fn merge_replaces_overlapping_range() {
        let mut base = list(&[(0, 5, BidiClass::L, 0)]);
        let overlay = list(&[(2, 1, BidiClass::R, 1)]);
        base.merge(&overlay);
        let pieces: Vec<_> = base.non_sentinels().copied().collect();
        assert_eq!(pieces, vec![
            Run { pos: 0, len: 2, typ: BidiClass::L, level: 0 },
            Run { pos: 2, len: 1, typ: BidiClass::R, level: 1 },
            Run { pos: 3, len: 2, typ: BidiClass::L, level: 0 },
        ]);
    }

    #[test]
    fn merge_drops_spans_behind_cursor() {
        let mut base = list(&[(0, 5, BidiClass::L, 0)]);
        let overlay = list(&[(3, 2, BidiClass::R, 1), (0, 1, BidiClass::R, 1)]);
        // second overlay span (constructed out of order above) has pos 0 < cursor 5
        base.merge(&overlay);
        let pieces: Vec<_> = base.non_sentinels().copied().collect();
        assert_eq!(pieces, vec![
            Run { pos: 0, len: 3, typ: BidiClass::L, level: 0 },
            Run { pos: 3, len: 2, typ: BidiClass::R, level: 1 },
        ]);
    }
}
