//! Standard seed placement for single elimination brackets.
//!
//! The tables place seed 1 against the last seed, seed 2 against the second to last and so on,
//! arranged so that the top seeds can only meet in the latest possible round. Only brackets with
//! 2, 4, 8 or 16 slots have a table. All other sizes fall back to placing seed `k` into slot `k`,
//! which does **not** keep the top seeds apart.

const SLOTS_2: [usize; 2] = [1, 2];
const SLOTS_4: [usize; 4] = [1, 4, 3, 2];
const SLOTS_8: [usize; 8] = [1, 8, 5, 4, 3, 6, 7, 2];
const SLOTS_16: [usize; 16] = [1, 16, 9, 8, 5, 12, 13, 4, 3, 14, 11, 6, 7, 10, 15, 2];

/// A mapping from seeds to 1-based slot positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A standard placement table. The slot of seed `n` is stored at index `n - 1`.
    Table(&'static [usize]),
    /// Seed `k` is placed into slot `k`.
    Identity(usize),
}

impl Placement {
    /// Returns the placement for a bracket with `slot_count` slots.
    pub fn new(slot_count: usize) -> Self {
        match slot_count {
            2 => Self::Table(&SLOTS_2),
            4 => Self::Table(&SLOTS_4),
            8 => Self::Table(&SLOTS_8),
            16 => Self::Table(&SLOTS_16),
            n => {
                log::debug!("No placement table for {} slots, using identity placement", n);
                Self::Identity(n)
            }
        }
    }

    /// Returns the 1-based slot for the 1-based `seed`. Returns `None` if the placement has no
    /// entry for `seed`.
    pub fn slot(&self, seed: usize) -> Option<usize> {
        if seed == 0 {
            return None;
        }

        match self {
            Self::Table(table) => table.get(seed - 1).copied(),
            Self::Identity(slots) => (seed <= *slots).then_some(seed),
        }
    }
}
