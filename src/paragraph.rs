//! The paragraph analyser (spec §2, §4.7): assembles the classifier,
//! explicit/weak/neutral/implicit passes, explicit reinjection, and L1
//! into the single pipeline the façade in `lib.rs` calls.
//!
//! Where to run L1 is spec.md's first open design question (§9): run it
//! here, inside the analyser, so `get_embedding_levels` sees L1-reset
//! levels — that's the behaviour UAX #9 describes, and the one the
//! reference implementation's corrected copy follows.

use crate::char_data;
use crate::error::BidiError;
use crate::explicit::resolve_explicit;
use crate::implicit::resolve_implicit;
use crate::neutral::resolve_neutral;
use crate::runs::{Run, RunList};
use crate::types::{BidiClass, Direction, RawLevel};
use crate::weak::resolve_weak;

/// Safety cap on input length (spec §7, item 1: "n exceeds the
/// implementation's configured maximum"). Not a UAX #9 requirement, just
/// this crate's own guard against unbounded allocation.
pub const MAX_STRING_LENGTH: usize = 1 << 24;

pub struct Analysis {
    pub base_direction: Direction,
    pub embedding_levels: Vec<u8>,
    pub max_level: u8,
}

fn first_strong_direction(types: &[BidiClass]) -> Option<Direction> {
    types.iter().find_map(|&t| match t {
        BidiClass::L => Some(Direction::Ltr),
        BidiClass::R | BidiClass::AL => Some(Direction::Rtl),
        _ => None,
    })
}

/// P2/P3: resolve `requested` to a concrete L/R direction. A caller-given
/// strong direction is used as-is — the scan only runs for `Auto`. When no
/// strong character is found, this falls back to `L`, matching spec §7's
/// "Empty input" rule generalised to non-empty input with no strong
/// character (spec.md's `Direction` has no separate "weak hint" case, so
/// there's nothing else to fall back to).
fn resolve_base_direction(types: &[BidiClass], requested: Direction) -> Direction {
    match requested {
        Direction::Ltr | Direction::Rtl => requested,
        Direction::Auto => first_strong_direction(types).unwrap_or(Direction::Ltr),
    }
}

/// Assign inherited levels (spec §4.7) to the detached explicit/BN spans
/// before they're merged back: a span's level is that of whatever
/// resolved or already-leveled explicit span immediately precedes it by
/// position, or `base_level` if it precedes all resolved content.
fn inherit_explicit_levels(resolved: &RunList, explicits: &mut RunList, base_level: u8) {
    let mut items: Vec<(usize, bool, usize)> = Vec::new();
    for (i, r) in resolved.runs.iter().enumerate() {
        if !r.is_sentinel() {
            items.push((r.pos, false, i));
        }
    }
    for (i, r) in explicits.runs.iter().enumerate() {
        if !r.is_sentinel() {
            items.push((r.pos, true, i));
        }
    }
    items.sort_by_key(|&(pos, _, _)| pos);

    let mut last_level: RawLevel = base_level as RawLevel;
    for (_, is_explicit, idx) in items {
        if is_explicit {
            explicits.runs[idx].level = last_level;
        } else {
            last_level = resolved.runs[idx].level;
        }
    }
}

/// L1: reset trailing separators/whitespace/explicits/BN to the base
/// level and direction, scanning the *original* classification right to
/// left, then merge the overlay into `resolved`.
fn apply_l1(resolved: &mut RunList, original_types: &[BidiClass], base_level: u8) {
    let n = original_types.len();
    let mut reset = vec![false; n];
    let mut in_trailing_run = true; // end of paragraph counts as trailing
    for i in (0..n).rev() {
        let t = original_types[i];
        if t.is_separator() {
            reset[i] = true;
            in_trailing_run = true;
        } else if in_trailing_run && (t == BidiClass::WS || t.is_explicit_or_bn()) {
            reset[i] = true;
        } else {
            in_trailing_run = false;
        }
    }

    let base_typ = if base_level & 1 == 1 { BidiClass::R } else { BidiClass::L };
    let mut overlay_runs = vec![Run { pos: 0, len: 0, typ: BidiClass::SOT, level: crate::types::LEVEL_START }];
    let mut i = 0;
    while i < n {
        if !reset[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && reset[i] {
            i += 1;
        }
        overlay_runs.push(Run { pos: start, len: i - start, typ: base_typ, level: base_level as RawLevel });
    }
    overlay_runs.push(Run { pos: n, len: 0, typ: BidiClass::EOT, level: crate::types::LEVEL_END });
    let overlay = RunList { runs: overlay_runs };
    resolved.merge(&overlay);
}

/// Run the full pipeline over `text` and return resolved levels and base
/// direction. Does not perform L2–L4 reordering; see `reorder`.
pub fn analyze(text: &[char], requested: Direction) -> Result<Analysis, BidiError> {
    if text.len() > MAX_STRING_LENGTH {
        return Err(BidiError::InputTooLarge { len: text.len(), max: MAX_STRING_LENGTH });
    }
    if text.is_empty() {
        let base_direction = if requested.is_strong() { requested } else { Direction::Ltr };
        return Ok(Analysis { base_direction, embedding_levels: Vec::new(), max_level: 0 });
    }

    let debug = crate::debug_status();
    let types: Vec<BidiClass> = text.iter().map(|&c| char_data::classify(c)).collect();
    let base_direction = resolve_base_direction(&types, requested);
    let base_level = base_direction.to_level();
    if debug {
        tracing::debug!(n = text.len(), ?base_direction, "resolved paragraph base direction (P2/P3)");
    }

    let mut result = resolve_explicit(&types, base_level);
    if debug {
        tracing::debug!("explicit levels resolved (X1-X9)");
    }

    resolve_weak(&mut result.resolved, base_level);
    if debug {
        tracing::debug!("weak types resolved (W1-W7)");
    }

    resolve_neutral(&mut result.resolved, base_level);
    if debug {
        tracing::debug!("neutral types resolved (N1-N2)");
    }

    let max_level = resolve_implicit(&mut result.resolved);
    if debug {
        tracing::debug!(max_level, "implicit levels resolved (I1-I2)");
    }

    inherit_explicit_levels(&result.resolved, &mut result.explicits, base_level);
    result.resolved.merge(&result.explicits);
    if debug {
        tracing::debug!("explicit/BN spans reinjected");
    }

    apply_l1(&mut result.resolved, &types, base_level);
    if debug {
        tracing::debug!("L1 trailing whitespace reset applied");
    }

    let embedding_levels: Vec<u8> = result.resolved.levels().iter().map(|&l| l.max(0) as u8).collect();
    Ok(Analysis { base_direction, embedding_levels, max_level })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels_for(s: &str, dir: Direction) -> (Vec<u8>, Direction) {
        let chars: Vec<char> = s.chars().collect();
        let a = analyze(&chars, dir).unwrap();
        (a.embedding_levels, a.base_direction)
    }

    #[test]
    fn pure_ltr_text_stays_at_level_zero() {
        let (levels, dir) = levels_for("hello world", Direction::Auto);
        assert_eq!(dir, Direction::Ltr);
        assert!(levels.iter().all(|&l| l == 0));
    }

    #[test]
    fn pure_rtl_hebrew_resolves_to_level_one() {
        let (levels, dir) = levels_for("\u{05D0}\u{05D1}\u{05D2}", Direction::Auto);
        assert_eq!(dir, Direction::Rtl);
        assert!(levels.iter().all(|&l| l == 1));
    }

    #[test]
    fn trailing_whitespace_resets_to_base_level() {
        let chars: Vec<char> = "\u{05D0}\u{05D1}  ".chars().collect();
        let a = analyze(&chars, Direction::Auto).unwrap();
        assert_eq!(a.embedding_levels[2], 1);
        assert_eq!(a.embedding_levels[3], 1);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let a = analyze(&[], Direction::Auto).unwrap();
        assert_eq!(a.base_direction, Direction::Ltr);
        assert!(a.embedding_levels.is_empty());
    }

    #[test]
    fn input_too_large_is_rejected() {
        let chars = vec!['a'; MAX_STRING_LENGTH + 1];
        assert!(matches!(analyze(&chars, Direction::Auto), Err(BidiError::InputTooLarge { .. })));
    }
}
