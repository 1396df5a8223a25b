use std::fmt;

use serde::{Deserialize, Serialize};

/// Code letters in folder order; a folder word's variant bits index into this.
pub const CHIP_CODES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipCode {
    Code(char),
    Unknown(usize),
}

impl ChipCode {
    pub const ASTERISK: Self = Self::Code('*');

    pub fn from_raw(raw: usize) -> Self {
        match CHIP_CODES.as_bytes().get(raw) {
            Some(&b) => Self::Code(char::from(b)),
            None => Self::Unknown(raw),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        CHIP_CODES.contains(c).then_some(Self::Code(c))
    }

    /// Index into the code alphabet; `None` for a letter outside it.
    pub fn raw(&self) -> Option<usize> {
        match *self {
            Self::Code(c) => CHIP_CODES.find(c),
            Self::Unknown(raw) => Some(raw),
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match *self {
            Self::Code(c) => Some(c),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for ChipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Code(c) => write!(f, "{c}"),
            Self::Unknown(raw) => write!(f, "?({raw})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChipCode;

    #[test]
    fn raw_values_map_through_the_code_alphabet() {
        assert_eq!(ChipCode::from_raw(0), ChipCode::Code('A'));
        assert_eq!(ChipCode::from_raw(25), ChipCode::Code('Z'));
        assert_eq!(ChipCode::from_raw(26), ChipCode::ASTERISK);
        assert_eq!(ChipCode::from_raw(27), ChipCode::Unknown(27));
        assert_eq!(ChipCode::ASTERISK.raw(), Some(26));
        assert_eq!(ChipCode::Unknown(40).raw(), Some(40));
        assert_eq!(ChipCode::Code('#').raw(), None);
        assert_eq!(ChipCode::Code('a').raw(), None);
    }

    #[test]
    fn from_char_accepts_lowercase_and_rejects_strays() {
        assert_eq!(ChipCode::from_char('j'), Some(ChipCode::Code('J')));
        assert_eq!(ChipCode::from_char('*'), Some(ChipCode::ASTERISK));
        assert_eq!(ChipCode::from_char('#'), None);
    }

    #[test]
    fn display_marks_unknown_codes() {
        assert_eq!(ChipCode::Code('S').to_string(), "S");
        assert_eq!(ChipCode::Unknown(31).to_string(), "?(31)");
    }
}
