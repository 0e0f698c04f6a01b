//! Explicit-level resolver (X1–X9, spec §4.3).
//!
//! Walks the run list built by `RunList::from_types`, one maximal same-type
//! run at a time, but a run of several identical explicit codes is still
//! several independent push-or-pop operations internally (a run of N `RLE`s
//! pushes N times) before the whole run is detached in one shot via
//! `RunList::remove_and_append` (spec §4.2) into the side "explicits" list.
//! A depth-bounded status stack and a two-interval overflow counter let
//! PDFs unwind correctly even when MAX_LEVEL was straddled mid-stream.

use crate::runs::RunList;
use crate::types::{BidiClass, OverrideStatus, RawLevel, LEVEL_REMOVED, MAX_LEVEL};

/// One status-stack frame: the level and override in effect before a push.
#[derive(Debug, Clone, Copy)]
struct StatusFrame {
    level: RawLevel,
    override_status: OverrideStatus,
}

/// The two-interval overflow counter (spec §9: "a small typed value, not
/// two loose integers"). `over_pushed` counts rejected pushes since the
/// stack last had room; `first_interval` records where, within that run of
/// rejections, the first MAX_LEVEL-1 boundary was crossed, so a PDF that
/// later straddles the boundary pops from the right interval.
#[derive(Debug, Clone, Copy, Default)]
struct OverPushed {
    over_pushed: u32,
    first_interval: u32,
}

impl OverPushed {
    fn note_rejected_push(&mut self, level_before: RawLevel) {
        self.over_pushed += 1;
        if level_before == MAX_LEVEL as RawLevel - 1 {
            self.first_interval = self.over_pushed;
        }
    }

    /// Returns `true` if this PDF was absorbed by the overflow counters
    /// rather than the real stack.
    fn note_pdf(&mut self) -> bool {
        if self.over_pushed > self.first_interval {
            self.over_pushed -= 1;
            true
        } else if self.over_pushed == self.first_interval && self.first_interval > 0 {
            self.over_pushed -= 1;
            self.first_interval = 0;
            true
        } else {
            false
        }
    }
}

/// Result of the explicit-level pass: the surviving spans (stamped with
/// their resolved level and, under an active override, their overridden
/// type) and the side list of detached explicit/BN spans.
pub struct ExplicitResult {
    pub resolved: RunList,
    pub explicits: RunList,
}

fn next_level(level: RawLevel, want_odd: bool) -> RawLevel {
    let mut candidate = level + 1;
    if (candidate % 2 == 1) != want_odd {
        candidate += 1;
    }
    candidate
}

/// Run X1–X9 over `types`, starting at `base_level` (0 or 1).
pub fn resolve_explicit(types: &[BidiClass], base_level: u8) -> ExplicitResult {
    let mut resolved = RunList::from_types(types);
    let mut explicits = RunList::empty(types.len());

    let mut stack: Vec<StatusFrame> = Vec::with_capacity(MAX_LEVEL as usize + 2);
    let mut level: RawLevel = base_level as RawLevel;
    let mut override_status = OverrideStatus::Neutral;
    let mut over = OverPushed::default();

    // `idx` walks the non-sentinel body of `resolved`; every branch that
    // detaches the current run via `remove_and_append` leaves the next run
    // sitting at the same `idx` (the vector shifts down), so only the
    // surviving branch advances it.
    let mut idx = 1;
    while idx < resolved.runs.len() - 1 {
        let run = resolved.runs[idx];
        match run.typ {
            BidiClass::LRE | BidiClass::RLE | BidiClass::LRO | BidiClass::RLO => {
                let want_odd = matches!(run.typ, BidiClass::RLE | BidiClass::RLO);
                let pushed_override = match run.typ {
                    BidiClass::LRE | BidiClass::RLE => OverrideStatus::Neutral,
                    BidiClass::LRO => OverrideStatus::Ltr,
                    BidiClass::RLO => OverrideStatus::Rtl,
                    _ => unreachable!(),
                };
                // A run of N identical explicit codes is N independent
                // push attempts, not one: MAX_LEVEL can be straddled
                // mid-run.
                for _ in 0..run.len {
                    let new_level = next_level(level, want_odd);
                    if new_level <= MAX_LEVEL as RawLevel {
                        stack.push(StatusFrame { level, override_status });
                        level = new_level;
                        override_status = pushed_override;
                    } else {
                        over.note_rejected_push(level);
                    }
                }
                resolved.remove_and_append(idx, LEVEL_REMOVED, &mut explicits);
            }
            BidiClass::PDF => {
                for _ in 0..run.len {
                    if !over.note_pdf() {
                        if let Some(frame) = stack.pop() {
                            level = frame.level;
                            override_status = frame.override_status;
                        }
                        // empty stack and zero counters: no-op, matches X7.
                    }
                }
                resolved.remove_and_append(idx, LEVEL_REMOVED, &mut explicits);
            }
            BidiClass::BN => {
                resolved.remove_and_append(idx, LEVEL_REMOVED, &mut explicits);
            }
            _ => {
                resolved.runs[idx].typ = override_status.as_bidi_class().unwrap_or(run.typ);
                resolved.runs[idx].level = level;
                idx += 1;
            }
        }
    }

    ExplicitResult { resolved, explicits }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved_spans(r: &ExplicitResult) -> Vec<(BidiClass, RawLevel)> {
        r.resolved.non_sentinels().map(|run| (run.typ, run.level)).collect()
    }

    #[test]
    fn lre_pdf_pair_is_balanced() {
        use BidiClass::*;
        let types = [L, LRE, L, PDF, L];
        let r = resolve_explicit(&types, 0);
        assert_eq!(resolved_spans(&r), vec![(L, 0), (L, 2), (L, 0)]);
    }

    #[test]
    fn rlo_overrides_enclosed_type() {
        use BidiClass::*;
        let types = [RLO, L, PDF];
        let r = resolve_explicit(&types, 0);
        assert_eq!(resolved_spans(&r), vec![(R, 1)]);
    }

    #[test]
    fn deep_nesting_saturates_at_max_level_and_unwinds_cleanly() {
        use BidiClass::*;
        let mut types = Vec::new();
        for _ in 0..(MAX_LEVEL as usize + 10) {
            types.push(RLE);
        }
        types.push(L);
        for _ in 0..(MAX_LEVEL as usize + 10) {
            types.push(PDF);
        }
        let r = resolve_explicit(&types, 0);
        let spans = resolved_spans(&r);
        // the only resolved (non-explicit) span is the inner `L`
        assert_eq!(spans.len(), 1);
        assert!(spans[0].1 <= MAX_LEVEL as RawLevel);
        assert_eq!(spans[0].1 % 2, 1); // odd: deepest level reached is an RLE level
    }

    #[test]
    fn unmatched_pdf_is_a_no_op() {
        use BidiClass::*;
        let types = [L, PDF, L];
        let r = resolve_explicit(&types, 0);
        assert_eq!(resolved_spans(&r), vec![(L, 0), (L, 0)]);
    }
}
