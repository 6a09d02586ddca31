use crate::alphabet::{index_of, letter_at, LETTERS};
use crate::error::{EnigmaError, Result};

const SIZE: i32 = LETTERS as i32;

/// A single wheel: fixed wiring plus the mutable position/ring state
///
/// Templates live in the catalog; every setting owns its own copy, so
/// stepping one setting never moves the wheels of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    forward: [u8; LETTERS],
    reverse: [u8; LETTERS],
    notches: Vec<u8>,
    /// Grundstellung, 0-25
    pub position: u8,
    /// Ringstellung, 0-25
    pub ring_setting: u8,
}

impl Rotor {
    /// Build a rotor from its wiring (the letter each input is wired to) and
    /// its notch letters
    pub fn new(name: &str, wiring: &str, notches: &[&str]) -> Result<Self> {
        let name = name.to_uppercase();
        if wiring.len() != LETTERS {
            return Err(EnigmaError::InvalidCatalog(format!(
                "rotor {}: wiring {:?} has {} letters, expected {}",
                name,
                wiring,
                wiring.len(),
                LETTERS
            )));
        }

        let mut forward = [0u8; LETTERS];
        let mut reverse = [u8::MAX; LETTERS];
        for (index, byte) in wiring.bytes().enumerate() {
            let mapped = index_of(byte).ok_or_else(|| {
                EnigmaError::InvalidCatalog(format!(
                    "rotor {}: invalid wiring letter {:?}",
                    name,
                    char::from(byte)
                ))
            })?;
            if reverse[mapped as usize] != u8::MAX {
                return Err(EnigmaError::InvalidCatalog(format!(
                    "rotor {}: letter {} wired twice",
                    name,
                    letter_at(mapped)
                )));
            }
            forward[index] = mapped;
            reverse[mapped as usize] = index as u8;
        }

        let mut notch_positions = Vec::with_capacity(notches.len());
        for notch in notches {
            if notch.len() != 1 {
                return Err(EnigmaError::InvalidCatalog(format!(
                    "rotor {}: invalid notch {:?}, expected 1 character",
                    name, notch
                )));
            }
            let position = index_of(notch.as_bytes()[0]).ok_or_else(|| {
                EnigmaError::InvalidCatalog(format!("rotor {}: invalid notch {:?}", name, notch))
            })?;
            notch_positions.push(position);
        }

        Ok(Self {
            name,
            forward,
            reverse,
            notches: notch_positions,
            position: 0,
            ring_setting: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notches(&self) -> &[u8] {
        &self.notches
    }

    pub fn forward_table(&self) -> &[u8; LETTERS] {
        &self.forward
    }

    pub fn reverse_table(&self) -> &[u8; LETTERS] {
        &self.reverse
    }

    /// Rotate by one position
    pub fn advance(&mut self) {
        self.position = ((self.position as usize + 1) % LETTERS) as u8;
    }

    /// True when the current position carries a notch
    pub fn at_notch(&self) -> bool {
        self.notches.contains(&self.position)
    }

    /// Substitute on the way towards the reflector
    pub fn encrypt_forward(&self, letter: u8) -> u8 {
        let advance = self.offset();
        let x = (i32::from(letter) + SIZE + advance).rem_euclid(SIZE);
        let y = i32::from(self.forward[x as usize]);
        (y + SIZE - advance).rem_euclid(SIZE) as u8
    }

    /// Substitute on the way back from the reflector
    pub fn encrypt_reverse(&self, letter: u8) -> u8 {
        let ring = i32::from(self.ring_setting);
        let position = i32::from(self.position);
        let x = (i32::from(letter) - ring + position + SIZE).rem_euclid(SIZE);
        let y = i32::from(self.reverse[x as usize]);
        (y + ring - position + SIZE).rem_euclid(SIZE) as u8
    }

    /// True when both tables are complete bijections and inverse to each other
    pub fn is_consistent(&self) -> bool {
        let mut seen = [false; LETTERS];
        for (index, &value) in self.forward.iter().enumerate() {
            let value = value as usize;
            if value >= LETTERS || seen[value] || self.reverse[value] as usize != index {
                return false;
            }
            seen[value] = true;
        }
        true
    }

    fn offset(&self) -> i32 {
        i32::from(self.position) - i32::from(self.ring_setting)
    }
}
