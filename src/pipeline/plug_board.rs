use crate::alphabet::{index_of, letter_at, LETTERS};
use crate::error::{EnigmaError, Result};

/// Steckerbrett: pairs of swapped letters, everything else passes through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlugBoard {
    mapping: [u8; LETTERS],
}

impl Default for PlugBoard {
    fn default() -> Self {
        let mut mapping = [0u8; LETTERS];
        for (index, value) in mapping.iter_mut().enumerate() {
            *value = index as u8;
        }
        Self { mapping }
    }
}

impl PlugBoard {
    /// Parse whitespace separated letter pairs, e.g. `"AB CD EF"`
    pub fn parse(spec: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for plug in spec.split_whitespace() {
            let bytes = plug.as_bytes();
            if bytes.len() != 2 {
                return Err(EnigmaError::InvalidPlugSpec(format!(
                    "invalid plug {:?}, expected 2 characters",
                    plug
                )));
            }
            let (one, two) = match (index_of(bytes[0]), index_of(bytes[1])) {
                (Some(one), Some(two)) => (one, two),
                _ => {
                    return Err(EnigmaError::InvalidPlugSpec(format!(
                        "invalid plug {:?}",
                        plug
                    )))
                }
            };
            pairs.push((one, two));
        }
        Self::from_pairs(pairs)
    }

    /// Build from letter index pairs; a letter may only be plugged once
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u8)>,
    {
        let mut plugged = [false; LETTERS];
        let mut board = Self::default();
        for (one, two) in pairs {
            if one as usize >= LETTERS || two as usize >= LETTERS {
                return Err(EnigmaError::InvalidPlugSpec(format!(
                    "plug value out of range: {} {}",
                    one, two
                )));
            }
            let plug = format!("{}{}", letter_at(one), letter_at(two));
            if one == two {
                return Err(EnigmaError::InvalidPlugSpec(format!(
                    "plug {:?} connects a letter to itself",
                    plug
                )));
            }
            if plugged[one as usize] || plugged[two as usize] {
                return Err(EnigmaError::InvalidPlugSpec(format!(
                    "duplicate plug {:?}",
                    plug
                )));
            }
            plugged[one as usize] = true;
            plugged[two as usize] = true;
            board.mapping[one as usize] = two;
            board.mapping[two as usize] = one;
        }
        Ok(board)
    }

    /// Swap a letter through the board; unplugged letters are returned as is
    pub fn transform(&self, letter: u8) -> u8 {
        self.mapping.get(letter as usize).copied().unwrap_or(letter)
    }

    pub fn mapping(&self) -> &[u8; LETTERS] {
        &self.mapping
    }

    /// Connected pairs, lower letter first, sorted
    pub fn pairs(&self) -> Vec<(u8, u8)> {
        self.mapping
            .iter()
            .enumerate()
            .filter(|&(index, &value)| (index as u8) < value)
            .map(|(index, &value)| (index as u8, value))
            .collect()
    }

    pub fn is_identity(&self) -> bool {
        self.pairs().is_empty()
    }

    pub fn is_involution(&self) -> bool {
        self.mapping.iter().enumerate().all(|(index, &value)| {
            (value as usize) < LETTERS && self.mapping[value as usize] as usize == index
        })
    }
}

impl std::fmt::Display for PlugBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plugs: Vec<String> = self
            .pairs()
            .into_iter()
            .map(|(one, two)| format!("{}{}", letter_at(one), letter_at(two)))
            .collect();
        write!(f, "{}", plugs.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_PLUGS: &str = "DZ GB ME NL PY RQ SJ TF WI XV";

    #[test]
    fn test_default_is_identity() {
        let board = PlugBoard::default();
        assert!(board.is_identity());
        for letter in 0..LETTERS as u8 {
            assert_eq!(board.transform(letter), letter);
        }
    }

    #[test]
    fn test_parse_swaps_both_ways() {
        let board = PlugBoard::parse(REFERENCE_PLUGS).unwrap();
        for plug in REFERENCE_PLUGS.split_whitespace() {
            let bytes = plug.as_bytes();
            let one = index_of(bytes[0]).unwrap();
            let two = index_of(bytes[1]).unwrap();
            assert_eq!(board.transform(one), two);
            assert_eq!(board.transform(two), one);
        }
        // A, C, H, K, O, U are not plugged
        for letter in [b'A', b'C', b'H', b'K', b'O', b'U'] {
            let index = index_of(letter).unwrap();
            assert_eq!(board.transform(index), index);
        }
        assert!(board.is_involution());
    }

    #[test]
    fn test_parse_lowercase_and_extra_whitespace() {
        let board = PlugBoard::parse("  ab\tcd \n").unwrap();
        assert_eq!(board.transform(0), 1);
        assert_eq!(board.transform(3), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert!(PlugBoard::parse("").unwrap().is_identity());
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(matches!(
            PlugBoard::parse("ABC"),
            Err(EnigmaError::InvalidPlugSpec(_))
        ));
        assert!(matches!(
            PlugBoard::parse("A"),
            Err(EnigmaError::InvalidPlugSpec(_))
        ));
        assert!(matches!(
            PlugBoard::parse("A1"),
            Err(EnigmaError::InvalidPlugSpec(_))
        ));
        assert!(matches!(
            PlugBoard::parse("AA"),
            Err(EnigmaError::InvalidPlugSpec(_))
        ));
    }

    #[test]
    fn test_parse_rejects_reused_letter() {
        let err = PlugBoard::parse("AB CA").unwrap_err();
        assert!(matches!(err, EnigmaError::InvalidPlugSpec(_)));
        assert!(err.to_string().contains("duplicate"));
        assert!(PlugBoard::parse("AB BA").is_err());
    }

    #[test]
    fn test_pairs_and_display_are_sorted() {
        let board = PlugBoard::parse("XV DZ GB").unwrap();
        assert_eq!(board.pairs(), vec![(1, 6), (3, 25), (21, 23)]);
        assert_eq!(board.to_string(), "BG DZ VX");
    }

    #[test]
    fn test_transform_out_of_range_passes_through() {
        let board = PlugBoard::parse("AB").unwrap();
        assert_eq!(board.transform(30), 30);
    }
}
