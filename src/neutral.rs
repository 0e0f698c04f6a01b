//! Neutral resolver (N1, N2, spec §4.5).
//!
//! By the time this runs, `compact_neutral` has already merged adjacent
//! same-level neutral spans into single runs, so each remaining neutral
//! `Run` here is resolved as a whole rather than character by character.

use crate::runs::{Run, RunList};
use crate::types::BidiClass;

fn dir(level: i8) -> BidiClass {
    if level & 1 == 1 {
        BidiClass::R
    } else {
        BidiClass::L
    }
}

/// Numbers act as R for the purposes of N1's neighbour comparison.
fn as_strong(typ: BidiClass) -> BidiClass {
    match typ {
        BidiClass::EN | BidiClass::AN => BidiClass::R,
        other => other,
    }
}

pub fn resolve_neutral(resolved: &mut RunList, base_level: u8) {
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
    resolved.compact_equal();
}

fn resolve_level_run(run: &mut [Run], sor: BidiClass, eor: BidiClass) {
    let len = run.len();
    for i in 0..len {
        if !run[i].typ.is_neutral() {
            continue;
        }
        let prev = if i == 0 { sor } else { as_strong(run[i - 1].typ) };
        let next = if i == len - 1 { eor } else { as_strong(run[i + 1].typ) };
        run[i].typ = if prev == next { prev } else { dir(run[i].level) };
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
        resolve_neutral(&mut list, base_level);
        list.types()
    }

    #[test]
    fn n1_matching_strong_neighbours_win() {
        use BidiClass::*;
        assert_eq!(resolve(&[R, ON, R], 0), vec![R, R, R]);
        assert_eq!(resolve(&[L, ON, L], 0), vec![L, L, L]);
    }

    #[test]
    fn n2_falls_back_to_own_level_direction() {
        use BidiClass::*;
        assert_eq!(resolve(&[L, ON, R], 0), vec![L, L, R]);
    }

    #[test]
    fn numbers_act_as_r_for_neighbour_comparison() {
        use BidiClass::*;
        assert_eq!(resolve(&[EN, ON, R], 0), vec![EN, R, R]);
    }

    #[test]
    fn neutral_run_at_paragraph_boundary_uses_sor_eor() {
        use BidiClass::*;
        // base level 1 (R): sor/eor are both R, so a leading/trailing ON
        // run with no strong neighbour still resolves via N1's sor/eor.
        assert_eq!(resolve(&[ON, R], 1), vec![R, R]);
    }
}
