#[derive(Debug, Clone, PartialEq, Eq)]
/// Error type for recording a game.
pub enum TrackerError {
    /// Both seats were given the same name.
    SamePlayer { name: String },
    /// A result code other than 0 (draw), 1 or 2 (winning seat).
    InvalidResult { code: u8 },
}

impl std::error::Error for TrackerError {}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerError::SamePlayer { name } => {
                write!(f, "'{}' cannot play against themselves", name)
            }
            TrackerError::InvalidResult { code } => write!(
                f,
                "Invalid game result {}, expected 0 (draw), 1 or 2 (winning player)",
                code
            ),
        }
    }
}
