//! Room configuration.

/// Every room seats exactly this many players when full.
///
/// The role model (two symmetric roles) and the swap (a fixed
/// White↔Black exchange) are built around this number.
pub const MAX_PLAYERS: usize = 2;

/// Configuration for the room registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    /// Number of characters in generated room codes.
    ///
    /// Four characters from a 36-symbol alphabet gives about 1.7 million
    /// codes, far more than the number of rooms alive at once.
    pub code_length: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { code_length: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        assert_eq!(RoomConfig::default().code_length, 4);
    }
}
