use bracket_data::Quadrant;
use std::fmt;

// ---------------------------------------------------------------------------
// Seed placement — (round, seed) → slot index within a quadrant's wedge
// ---------------------------------------------------------------------------

/// Seed → local slot, one table per regional round, outermost first.
///
/// Row 0 (round of 64) interleaves seeds so the 1-seed and 2-seed paths can
/// only meet in the regional final (1 vs 16 at the top, 8 vs 9 adjacent, and
/// so on). Deeper rows double up: two seeds whose winners land in the same
/// slot share an entry.
pub const SEED_SLOTS: [[u32; 16]; 4] = [
    [0, 14, 10, 6, 4, 8, 12, 2, 3, 13, 9, 5, 7, 11, 15, 1],
    [0, 7, 5, 3, 2, 4, 6, 1, 1, 6, 4, 2, 3, 5, 7, 0],
    [0, 3, 2, 1, 1, 2, 3, 0, 0, 3, 2, 1, 1, 2, 3, 0],
    [0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0],
];

/// Which visual corner a quadrant occupies, as a slot-block index on the
/// ring. This ordering is load-bearing: changing it moves every region to a
/// different corner of the rendered circle.
pub fn quadrant_index(quadrant: Quadrant) -> u32 {
    match quadrant {
        Quadrant::BR => 0,
        Quadrant::BL => 1,
        Quadrant::TL => 2,
        Quadrant::TR => 3,
    }
}

/// Role a ring plays in the bracket, computed once from the total round
/// count instead of re-deriving `round == num_rounds - 1` at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingRole {
    /// A regular regional round (rounds 1 through num_rounds - 3).
    Regional,
    /// National semifinals: four slots, one per region.
    FinalFour,
    /// The final: two slots in a binary left/right split.
    Championship,
}

impl RingRole {
    pub fn of(round: u32, num_rounds: u32) -> Self {
        if round + 1 == num_rounds {
            RingRole::Championship
        } else if round + 2 == num_rounds {
            RingRole::FinalFour
        } else {
            RingRole::Regional
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    SeedOutOfRange { seed: u8 },
    RoundOutOfRange { round: u32, num_rounds: u32 },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::SeedOutOfRange { seed } => {
                write!(f, "seed {seed} outside 1..=16")
            }
            PlacementError::RoundOutOfRange { round, num_rounds } => {
                write!(f, "round {round} has no placement table in a {num_rounds}-round bracket")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Map a contestant to its global slot index on the ring for `round`.
///
/// - Championship ring: the two finalists take a binary left/right split by
///   originating quadrant ({TL, BR} → 0, {TR, BL} → 1).
/// - Final Four ring: one slot per region, the quadrant index directly.
/// - Regional rounds: the quadrant's slot block plus the seed table entry.
///   The table row shifts by `7 - num_rounds` so a 6-round (32-entry)
///   bracket reuses the deeper rows rather than carrying its own tables.
pub fn translate_to_slot(
    quadrant: Quadrant,
    round: u32,
    seed: u8,
    num_rounds: u32,
) -> Result<u32, PlacementError> {
    match RingRole::of(round, num_rounds) {
        RingRole::Championship => Ok(match quadrant {
            Quadrant::TL | Quadrant::BR => 0,
            Quadrant::TR | Quadrant::BL => 1,
        }),
        RingRole::FinalFour => Ok(quadrant_index(quadrant)),
        RingRole::Regional => {
            if !(1..=16).contains(&seed) {
                return Err(PlacementError::SeedOutOfRange { seed });
            }
            if round == 0 || round + 2 >= num_rounds {
                return Err(PlacementError::RoundOutOfRange { round, num_rounds });
            }
            let table_shift = 7u32.saturating_sub(num_rounds);
            let table_index = (round - 1 + table_shift) as usize;
            if table_index >= SEED_SLOTS.len() {
                return Err(PlacementError::RoundOutOfRange { round, num_rounds });
            }

            let ring_slots = slots_in_ring(round, num_rounds);
            let per_quadrant = ring_slots / 4;
            let local = SEED_SLOTS[table_index][(seed - 1) as usize];
            Ok(per_quadrant * quadrant_index(quadrant) + local)
        }
    }
}

/// Total slot count on the ring hosting `round`'s participants.
pub fn slots_in_ring(round: u32, num_rounds: u32) -> u32 {
    let entries = 2u32.pow(num_rounds.saturating_sub(1));
    (entries >> round.saturating_sub(1)).max(1)
}
