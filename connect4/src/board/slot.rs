use serde::{Deserialize, Serialize};

use crate::MalformedBoard;

/// One of the two seats at the board.
///
/// Player one always makes the first ply.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One,
    Two,
}

/// The content of a single position on the board.
///
/// On the wire, a slot is the integer 0 (empty), 1 or 2 (a token of that player).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Slot {
    #[default]
    Empty,
    Token(Player),
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The seat number, 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl Slot {
    pub fn is_empty(self) -> bool {
        self == Slot::Empty
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Slot::Empty => None,
            Slot::Token(player) => Some(player),
        }
    }

    /// The integer code of this slot, which is also its index into a glyph table.
    pub fn index(self) -> usize {
        match self {
            Slot::Empty => 0,
            Slot::Token(player) => player.number() as usize,
        }
    }
}

impl From<Player> for Slot {
    fn from(player: Player) -> Slot {
        Slot::Token(player)
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player.number()
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.index() as u8
    }
}

impl TryFrom<u8> for Player {
    type Error = MalformedBoard;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            _ => Err(MalformedBoard::InvalidToken { value }),
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = MalformedBoard;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Slot::Empty),
            _ => Player::try_from(value).map(Slot::Token),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_codes() {
        assert_eq!(u8::from(Slot::Empty), 0);
        assert_eq!(u8::from(Slot::Token(Player::One)), 1);
        assert_eq!(u8::from(Slot::Token(Player::Two)), 2);
        assert_eq!(Slot::try_from(2u8), Ok(Slot::Token(Player::Two)));
        assert_eq!(
            Slot::try_from(3u8),
            Err(MalformedBoard::InvalidToken { value: 3 })
        );
    }

    #[test]
    fn slot_json() {
        let slots: Vec<Slot> = serde_json::from_str("[0, 1, 2]").unwrap();
        assert_eq!(
            slots,
            vec![Slot::Empty, Slot::Token(Player::One), Slot::Token(Player::Two)]
        );
        assert!(serde_json::from_str::<Slot>("7").is_err());
        assert_eq!(serde_json::to_string(&Player::Two).unwrap(), "2");
    }
}
