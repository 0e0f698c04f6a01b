//! Weak-type resolver (W1–W7, spec §4.4).
//!
//! Each rule is applied as its own complete, ordered pass over every level
//! run (spec §9 flags a known inconsistency between two historical copies
//! of the reference implementation over how `last_strong` updates at level
//! boundaries during W2/W7 — here each rule is a single full left-to-right
//! sweep per level run, matching UAX #9 verbatim, so the "fused loop"
//! latches the reference source needs for its single-pass optimisation
//! never come up: W1 fully resolves before W2 reads it, W4 fully resolves
//! before W5 can rewrite a neighbour out from under it, and so on.

use crate::runs::{Run, RunList};
use crate::types::BidiClass;

fn dir(level: i8) -> BidiClass {
    if level & 1 == 1 {
        BidiClass::R
    } else {
        BidiClass::L
    }
}

/// Resolve W1–W7 over `resolved` (the explicit pass's surviving spans),
/// then compact adjacent neutral-or-equal spans as spec §4.4 requires.
pub fn resolve_weak(resolved: &mut RunList, base_level: u8) {
    let end = resolved.runs.len().saturating_sub(1);
    if end <= 1 {
        return;
    }
    let mut body: Vec<Run> = resolved.runs[1..end].to_vec();

    let mut start = 0;
    while start < body.len() {
        let mut stop = start + 1;
        while stop < body.len() && body[stop].level == body[start].level {
            stop += 1;
        }
        let prev_level = if start == 0 { base_level as i8 } else { body[start - 1].level };
        let next_level = if stop == body.len() { base_level as i8 } else { body[stop].level };
        let sor = dir(prev_level.max(body[start].level));
        let eor = dir(next_level.max(body[stop - 1].level));
        resolve_level_run(&mut body[start..stop], sor, eor);
        start = stop;
    }

    resolved.runs.splice(1..end, body);
    resolved.compact_neutral();
}

fn resolve_level_run(run: &mut [Run], sor: BidiClass, eor: BidiClass) {
    let len = run.len();
    let prev_of = |i: usize, run: &[Run]| if i == 0 { sor } else { run[i - 1].typ };
    let next_of = |i: usize, run: &[Run]| if i == len - 1 { eor } else { run[i + 1].typ };

    // W1: NSM -> previous type.
    for i in 0..len {
        if run[i].typ == BidiClass::NSM {
            run[i].typ = prev_of(i, run);
        }
    }

    // W2: EN -> AN if the last strong type seen (L/R/AL/sor) was AL.
    let mut last_strong = sor;
    for r in run.iter_mut() {
        match r.typ {
            BidiClass::L | BidiClass::R | BidiClass::AL => last_strong = r.typ,
            BidiClass::EN if last_strong == BidiClass::AL => r.typ = BidiClass::AN,
            _ => {}
        }
    }

    // W3: AL -> R.
    for r in run.iter_mut() {
        if r.typ == BidiClass::AL {
            r.typ = BidiClass::R;
        }
    }

    // W4: single ES between two EN -> EN; single CS between two equal numbers -> that number type.
    let snapshot = run.to_vec();
    let prev_of_snap = |i: usize| if i == 0 { sor } else { snapshot[i - 1].typ };
    let next_of_snap = |i: usize| if i == len - 1 { eor } else { snapshot[i + 1].typ };
    for i in 0..len {
        if snapshot[i].len != 1 {
            continue;
        }
        let (p, nx) = (prev_of_snap(i), next_of_snap(i));
        match snapshot[i].typ {
            BidiClass::ES if p == BidiClass::EN && nx == BidiClass::EN => run[i].typ = BidiClass::EN,
            BidiClass::CS if p == nx && (p == BidiClass::EN || p == BidiClass::AN) => run[i].typ = p,
            _ => {}
        }
    }

    // W5: a maximal run of ET (possibly spanning several still-unmerged
    // spans, e.g. one W1 just turned an NSM into ET) becomes EN if EN
    // touches either edge of the whole block, not just its own neighbour.
    let mut i = 0;
    while i < len {
        if run[i].typ != BidiClass::ET {
            i += 1;
            continue;
        }
        let block_start = i;
        while i < len && run[i].typ == BidiClass::ET {
            i += 1;
        }
        let block_end = i; // exclusive
        let (p, nx) = (prev_of(block_start, run), next_of(block_end - 1, run));
        if p == BidiClass::EN || nx == BidiClass::EN {
            for r in run[block_start..block_end].iter_mut() {
                r.typ = BidiClass::EN;
            }
        }
    }

    // W6: remaining ES, ET, CS -> ON.
    for r in run.iter_mut() {
        if matches!(r.typ, BidiClass::ES | BidiClass::ET | BidiClass::CS) {
            r.typ = BidiClass::ON;
        }
    }

    // W7: EN -> L if the last strong type seen was L.
    let mut last_strong = sor;
    for r in run.iter_mut() {
        match r.typ {
            BidiClass::L | BidiClass::R => last_strong = r.typ,
            BidiClass::EN if last_strong == BidiClass::L => r.typ = BidiClass::L,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::RunList;

    fn resolve(types: &[BidiClass], base_level: u8) -> Vec<BidiClass> {
        let mut list = RunList::from_types(types);
        for r in list.runs.iter_mut() {
            if !r.is_sentinel() {
                r.level = base_level as i8;
            }
        }
        resolve_weak(&mut list, base_level);
        list.types()
    }

    #[test]
    fn w1_nsm_takes_previous_type() {
        use BidiClass::*;
        assert_eq!(resolve(&[R, NSM, NSM], 0), vec![R, R, R]);
    }

    #[test]
    fn w2_en_after_al_becomes_an() {
        use BidiClass::*;
        assert_eq!(resolve(&[AL, EN], 0), vec![R, AN]);
    }

    #[test]
    fn w4_single_es_between_numbers_becomes_en() {
        // base level 1 (sor = R) so W7's "last strong = L" latch, which
        // starts at sor, can't silently relabel the leading EN to L.
        use BidiClass::*;
        assert_eq!(resolve(&[EN, ES, EN], 1), vec![EN, EN, EN]);
    }

    #[test]
    fn w4_cs_requires_matching_number_types() {
        use BidiClass::*;
        assert_eq!(resolve(&[EN, CS, AN], 1), vec![EN, ON, AN]);
        assert_eq!(resolve(&[AN, CS, AN], 1), vec![AN, AN, AN]);
    }

    #[test]
    fn w5_et_run_adjacent_to_en_becomes_en() {
        use BidiClass::*;
        assert_eq!(resolve(&[EN, ET, ET], 1), vec![EN, EN, EN]);
    }

    #[test]
    fn w5_propagates_across_a_run_split_by_w1() {
        // W1 turns the NSM into ET (copying its ET predecessor), leaving
        // two adjacent but separately-tracked ET spans; W5 must treat them
        // as one block and see the EN on the far side of both.
        use BidiClass::*;
        assert_eq!(resolve(&[ET, NSM, EN], 1), vec![EN, EN, EN]);
    }

    #[test]
    fn w7_en_after_l_becomes_l() {
        use BidiClass::*;
        assert_eq!(resolve(&[L, EN], 0), vec![L, L]);
    }

    #[test]
    fn w6_leftover_separators_become_on() {
        use BidiClass::*;
        assert_eq!(resolve(&[L, ES, R], 0), vec![L, ON, R]);
    }
}
