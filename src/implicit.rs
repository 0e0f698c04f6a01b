//! Implicit leveller (I1, I2, spec §4.6).

use crate::runs::RunList;
use crate::types::{BidiClass, RawLevel};

fn direction_to_level(typ: BidiClass) -> RawLevel {
    if typ == BidiClass::R {
        1
    } else {
        0
    }
}

/// Apply I1/I2 in place, returning the highest level reached.
pub fn resolve_implicit(resolved: &mut RunList) -> u8 {
    let mut max_level: RawLevel = 0;
    for run in resolved.runs.iter_mut() {
        if run.is_sentinel() {
            continue;
        }
        let l = run.level;
        run.level = if run.typ.is_number() {
            (l + 2) & !1
        } else {
            (l ^ direction_to_level(run.typ)) + (l & 1)
        };
        max_level = max_level.max(run.level);
    }
    max_level.max(0) as u8
}
