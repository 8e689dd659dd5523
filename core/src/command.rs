use crate::types::Direction;
use serde::{Deserialize, Serialize};

/// Everything an actor can be told to do in one step slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum MoveCommand {
    Step { direction: Direction },
    RandomStep,
    ChargeToggle,
    /// Hold position for `turns` executed step slots.
    Wait { turns: u32 },
    Quit,
    SaveRequest,
}

impl MoveCommand {
    /// Map a single-letter token or key to a command.
    /// `T` needs its count and is handled by the script parser.
    pub fn from_letter(letter: char) -> Option<Self> {
        if let Some(direction) = Direction::from_letter(letter) {
            return Some(Self::Step { direction });
        }
        match letter.to_ascii_uppercase() {
            'R' => Some(Self::RandomStep),
            'C' => Some(Self::ChargeToggle),
            'Q' => Some(Self::Quit),
            'G' => Some(Self::SaveRequest),
            _ => None,
        }
    }

    /// How many executed step slots this command occupies.
    pub fn repeat(&self) -> u32 {
        match self {
            Self::Wait { turns } => (*turns).max(1),
            _ => 1,
        }
    }
}
