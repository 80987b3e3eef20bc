//! The fixed 15-note diatonic scale played on the table (C3 to C5).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One key of the virtual keyboard, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Note {
    C3,
    D3,
    E3,
    F3,
    G3,
    A3,
    B3,
    C4,
    D4,
    E4,
    F4,
    G4,
    A4,
    B4,
    C5,
}

impl Note {
    /// Every note in keyboard order.
    pub const ALL: [Note; 15] = [
        Note::C3,
        Note::D3,
        Note::E3,
        Note::F3,
        Note::G3,
        Note::A3,
        Note::B3,
        Note::C4,
        Note::D4,
        Note::E4,
        Note::F4,
        Note::G4,
        Note::A4,
        Note::B4,
        Note::C5,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// MIDI pitch number.
    pub fn pitch(self) -> u8 {
        match self {
            Note::C3 => 48,
            Note::D3 => 50,
            Note::E3 => 52,
            Note::F3 => 53,
            Note::G3 => 55,
            Note::A3 => 57,
            Note::B3 => 59,
            Note::C4 => 60,
            Note::D4 => 62,
            Note::E4 => 64,
            Note::F4 => 65,
            Note::G4 => 67,
            Note::A4 => 69,
            Note::B4 => 71,
            Note::C5 => 72,
        }
    }

    /// Reverse pitch lookup; `None` for pitches off the scale.
    pub fn from_pitch(pitch: u8) -> Option<Note> {
        Self::ALL.iter().copied().find(|n| n.pitch() == pitch)
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::C3 => "C3",
            Note::D3 => "D3",
            Note::E3 => "E3",
            Note::F3 => "F3",
            Note::G3 => "G3",
            Note::A3 => "A3",
            Note::B3 => "B3",
            Note::C4 => "C4",
            Note::D4 => "D4",
            Note::E4 => "E4",
            Note::F4 => "F4",
            Note::G4 => "G4",
            Note::A4 => "A4",
            Note::B4 => "B4",
            Note::C5 => "C5",
        }
    }

    /// Position in keyboard order (0 = C3).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown note name: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_two_octaves_of_white_keys() {
        assert_eq!(Note::COUNT, 15);
        assert_eq!(Note::ALL[0].pitch(), 48);
        assert_eq!(Note::ALL[14].pitch(), 72);
        assert!(Note::ALL.windows(2).all(|w| w[0].pitch() < w[1].pitch()));
    }

    #[test]
    fn test_pitch_lookup() {
        assert_eq!(Note::from_pitch(60), Some(Note::C4));
        assert_eq!(Note::from_pitch(61), None);
        assert_eq!(Note::from_pitch(84), None);
    }

    #[test]
    fn test_index_matches_order() {
        for (i, note) in Note::ALL.iter().enumerate() {
            assert_eq!(note.index(), i);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("G4".parse::<Note>(), Ok(Note::G4));
        assert_eq!("c5".parse::<Note>(), Ok(Note::C5));
        assert!("C#4".parse::<Note>().is_err());
    }
}
