//! Frequency escalation for severe environments

use crate::entities::task::Frequency;

/// Move a base frequency one step toward Daily when the environment is severe.
///
/// Anchors (`ByCondition`, `ByHours`) are returned unchanged, and Daily is
/// the ceiling.
pub fn escalate(base: Frequency, severe: bool) -> Frequency {
    if !severe {
        return base;
    }
    match base.rank() {
        Some(rank) => {
            let next = (rank as usize + 1).min(Frequency::SCALE.len() - 1);
            Frequency::SCALE[next]
        }
        None => base,
    }
}
