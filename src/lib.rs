//! # ubidi
//!
//! The Unicode Bidirectional Algorithm (UAX #9) for a single paragraph.
//!
//! Given a sequence of code points and an optional base direction, this
//! crate produces the resolved embedding level of every code point, the
//! left-to-right visual reordering of those code points, and the
//! logical/visual index mappings between them — the transformation that
//! sits between a text buffer and a renderer that draws glyphs left to
//! right on screen.
//!
//! ## Pipeline
//!
//! ```text
//! code points
//!       |
//!   [char_data]   — classify() per UAX #9 bidi class
//!       |
//!   [explicit]    — X1-X9: embedding/override stack, over-push accounting
//!       |
//!   [weak]        — W1-W7: weak-type resolution
//!       |
//!   [neutral]     — N1-N2: neutral resolution
//!       |
//!   [implicit]    — I1-I2: level bump by direction parity
//!       |
//!   [paragraph]   — explicit reinjection, L1 trailing reset
//!       |
//!   [reorder]     — L2-L4: mirroring, level-descending reversal
//! ```
//!
//! Charset transcoders, CLI front-ends, and benchmark drivers are outside
//! this crate; `main.rs` is a thin demo binary, not part of the core.

pub mod char_data;
pub mod error;
pub mod explicit;
pub mod implicit;
pub mod neutral;
pub mod paragraph;
pub mod reorder;
pub mod runs;
pub mod types;
pub mod weak;

pub use error::BidiError;
pub use types::{BidiClass, Direction, MAX_LEVEL};

use std::sync::atomic::{AtomicBool, Ordering};

static MIRRORING: AtomicBool = AtomicBool::new(true);
static DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable or disable the L4 mirroring pass globally (spec §6, "Mirroring
/// toggle"). On by default.
pub fn set_mirroring(on: bool) {
    MIRRORING.store(on, Ordering::Relaxed);
}

pub fn mirroring_status() -> bool {
    MIRRORING.load(Ordering::Relaxed)
}

/// Enable or disable prose tracing of internal pipeline stages (spec §6,
/// "Debug toggle"). Purely diagnostic: emits `tracing::debug!` events
/// instead of the reference implementation's `fprintf`-based `DBG` macros.
pub fn set_debug(on: bool) {
    DEBUG.store(on, Ordering::Relaxed);
}

pub fn debug_status() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Full output of `log_to_visual`: resolved direction, levels, and the
/// visual reordering (spec §3 "Output arrays", §6).
#[derive(Debug, Clone)]
pub struct VisualInfo {
    pub base_direction: Direction,
    pub embedding_levels: Vec<u8>,
    pub visual_str: Vec<char>,
    pub visual_to_logical: Vec<usize>,
    pub logical_to_visual: Vec<usize>,
}

/// Resolve embedding levels and visual order for one paragraph.
///
/// `base_dir` is in: a caller-forced `Ltr`/`Rtl`, or `Auto` to derive the
/// direction from the first strong character (P2/P3). The returned
/// `VisualInfo::base_direction` is always `Ltr` or `Rtl`.
pub fn log_to_visual(text: &[char], base_dir: Direction) -> Result<VisualInfo, BidiError> {
    let analysis = paragraph::analyze(text, base_dir)?;
    let reordered = reorder::reorder(text, &analysis.embedding_levels, analysis.max_level, mirroring_status());
    Ok(VisualInfo {
        base_direction: analysis.base_direction,
        embedding_levels: analysis.embedding_levels,
        visual_str: reordered.visual_str,
        visual_to_logical: reordered.visual_to_logical,
        logical_to_visual: reordered.logical_to_visual,
    })
}

/// Resolve embedding levels only, without reordering (spec §6).
pub fn get_embedding_levels(text: &[char], base_dir: Direction) -> Result<(Vec<u8>, Direction), BidiError> {
    let analysis = paragraph::analyze(text, base_dir)?;
    Ok((analysis.embedding_levels, analysis.base_direction))
}

/// Strip explicit embedding/override codes (LRE, RLE, LRO, RLO, PDF) and
/// the LRM/RLM marks from `text` in place (spec §6; the LRM/RLM part is
/// the reference implementation's behaviour, `fribidi_remove_explicits`,
/// which the distilled spec's wording doesn't call out by name).
pub fn remove_explicits(text: &mut Vec<char>) {
    const LRM: char = '\u{200E}';
    const RLM: char = '\u{200F}';
    text.retain(|&c| c != LRM && c != RLM && !char_data::classify(c).is_explicit());
}
