//! Latent occupancy states for the two-state dynamic occupancy model.

/// Two-state occupancy classification of a site in a season.
///
/// The ecological state is never observed directly; surveys record
/// detection symbols and the state is inferred through the likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OccupancyState {
    /// The site holds no individuals of the target species.
    Unoccupied = 0,
    /// The site is occupied by the target species.
    Occupied = 1,
}

impl OccupancyState {
    /// Both states in index order.
    pub const ALL: [OccupancyState; 2] = [Self::Unoccupied, Self::Occupied];

    /// Returns the zero-based index of this state (matches the `#[repr(u8)]` discriminant).
    pub fn as_index(self) -> usize {
        self as usize
    }
}
