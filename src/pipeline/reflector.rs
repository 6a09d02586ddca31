use crate::alphabet::{index_of, letter_at, LETTERS};
use crate::error::{EnigmaError, Result};

/// Umkehrwalze: fixed, self-inverse wiring without fixed points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflector {
    name: String,
    mapping: [u8; LETTERS],
}

impl Reflector {
    pub fn new(name: &str, wiring: &str) -> Result<Self> {
        let name = name.to_uppercase();
        if wiring.len() != LETTERS {
            return Err(EnigmaError::InvalidCatalog(format!(
                "reflector {}: wiring {:?} has {} letters, expected {}",
                name,
                wiring,
                wiring.len(),
                LETTERS
            )));
        }

        let mut mapping = [0u8; LETTERS];
        for (index, byte) in wiring.bytes().enumerate() {
            mapping[index] = index_of(byte).ok_or_else(|| {
                EnigmaError::InvalidCatalog(format!(
                    "reflector {}: invalid value {:?}",
                    name,
                    char::from(byte)
                ))
            })?;
        }

        let reflector = Self { name, mapping };
        if let Err(reason) = reflector.check_involution() {
            return Err(EnigmaError::InvalidCatalog(format!(
                "reflector {}: {}",
                reflector.name, reason
            )));
        }
        Ok(reflector)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mapping(&self) -> &[u8; LETTERS] {
        &self.mapping
    }

    pub fn reflect(&self, letter: u8) -> Result<u8> {
        self.mapping
            .get(letter as usize)
            .copied()
            .ok_or(EnigmaError::InvalidReflection(letter as usize))
    }

    /// Describe the first broken invariant: out of range value, fixed point,
    /// or a letter that does not reflect back
    pub fn check_involution(&self) -> std::result::Result<(), String> {
        for (index, &value) in self.mapping.iter().enumerate() {
            if value as usize >= LETTERS {
                return Err(format!("mapping value {} out of range 0-25", value));
            }
            if value as usize == index {
                return Err(format!("letter {} reflects to itself", letter_at(value)));
            }
            if self.mapping[value as usize] as usize != index {
                return Err(format!(
                    "letter {} reflects to {} but not back",
                    letter_at(index as u8),
                    letter_at(value)
                ));
            }
        }
        Ok(())
    }
}
