//! Textual key format
//!
//! A key is a YAML document naming the wheel order, each wheel's position
//! and ring setting, the reflector and the plug board:
//!
//! ```text
//! rotors:
//!   - name: V
//!     position: Z
//!     ring_setting: L
//!   - I: 25          # short form: ring as letter or 1-based number, position A
//! reflector: B
//! plug_board: "DZ GB ME"   # or a letter -> letter mapping
//! ```

use crate::alphabet::{letter_at, parse_letter, LETTERS};
use crate::error::{EnigmaError, Result};
use crate::pipeline::PlugBoard;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ring setting as written in key sheets: a letter or a 1-based number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RingValue {
    Number(u32),
    Letter(String),
}

impl RingValue {
    /// 0-based ring index
    pub fn index(&self) -> Result<u8> {
        match self {
            Self::Number(n) if (1..=LETTERS as u32).contains(n) => Ok((n - 1) as u8),
            Self::Letter(s) if s.len() == 1 => parse_letter(s).ok_or_else(|| {
                EnigmaError::InvalidSetting(format!("invalid ring setting {:?}", s))
            }),
            Self::Number(n) => Err(EnigmaError::InvalidSetting(format!(
                "invalid ring setting {}, expected 1-26",
                n
            ))),
            Self::Letter(s) => Err(EnigmaError::InvalidSetting(format!(
                "invalid ring setting {:?}, expected 1 letter",
                s
            ))),
        }
    }
}

/// One wheel of an exported setting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRotor")]
pub struct ExportedRotor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Grundstellung letter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub position: String,
    /// Ringstellung letter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ring_setting: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRotor {
    Full {
        name: String,
        #[serde(default)]
        position: Option<String>,
        #[serde(default)]
        ring_setting: Option<RingValue>,
    },
    Short(BTreeMap<String, RingValue>),
}

impl TryFrom<RawRotor> for ExportedRotor {
    type Error = String;

    fn try_from(raw: RawRotor) -> std::result::Result<Self, Self::Error> {
        let (name, position, ring) = match raw {
            RawRotor::Full {
                name,
                position,
                ring_setting,
            } => (name, position, ring_setting),
            RawRotor::Short(entries) => {
                if entries.len() != 1 {
                    return Err(format!(
                        "invalid rotor with {} entries, expected single item",
                        entries.len()
                    ));
                }
                let (name, ring) = entries.into_iter().next().ok_or("empty rotor")?;
                (name, None, Some(ring))
            }
        };

        let position = match position {
            Some(text) => match (text.len(), parse_letter(&text)) {
                (1, Some(index)) => index,
                _ => return Err(format!("invalid position {:?}", text)),
            },
            None => 0,
        };
        let ring = match ring {
            Some(value) => value.index().map_err(|e| e.to_string())?,
            None => 0,
        };

        Ok(Self {
            name: name.to_uppercase(),
            position: letter_at(position).to_string(),
            ring_setting: letter_at(ring).to_string(),
        })
    }
}

/// Plug board as written in keys: `"AB CD"` or `{A: B, C: D}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportedPlugBoard {
    Pairs(String),
    Mapping(BTreeMap<String, String>),
}

impl Default for ExportedPlugBoard {
    fn default() -> Self {
        Self::Mapping(BTreeMap::new())
    }
}

impl ExportedPlugBoard {
    /// Full letter -> letter mapping, both directions of every pair and the
    /// unplugged letters mapped to themselves
    pub fn from_plug_board(board: &PlugBoard) -> Self {
        Self::Mapping(
            board
                .mapping()
                .iter()
                .enumerate()
                .map(|(plug, &value)| {
                    (letter_at(plug as u8).to_string(), letter_at(value).to_string())
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Pairs(text) => text.trim().is_empty(),
            Self::Mapping(entries) => entries.is_empty(),
        }
    }

    /// Connected pairs, lower letter first, sorted and without identities
    pub fn pairs(&self) -> Result<Vec<(u8, u8)>> {
        match self {
            Self::Pairs(text) => Ok(PlugBoard::parse(text)?.pairs()),
            Self::Mapping(entries) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (plug, value) in entries {
                    let one = single_letter(plug)?;
                    let two = single_letter(value)?;
                    if one != two {
                        pairs.push((one.min(two), one.max(two)));
                    }
                }
                pairs.sort_unstable();
                pairs.dedup();
                Ok(pairs)
            }
        }
    }

    pub fn to_plug_board(&self) -> Result<PlugBoard> {
        PlugBoard::from_pairs(self.pairs()?)
    }

    /// `<letter><partner>` tokens for every entry that is not an identity,
    /// sorted by the entry's letter; a string board is read as its mapping
    pub fn plugs(&self) -> Result<Vec<String>> {
        let mut entries = match self {
            Self::Pairs(text) => {
                let board = PlugBoard::parse(text)?;
                board
                    .mapping()
                    .iter()
                    .enumerate()
                    .map(|(plug, &value)| (plug as u8, value))
                    .collect::<Vec<_>>()
            }
            Self::Mapping(entries) => {
                let mut parsed = Vec::with_capacity(entries.len());
                for (plug, value) in entries {
                    parsed.push((single_letter(plug)?, single_letter(value)?));
                }
                parsed
            }
        };
        entries.retain(|(plug, value)| plug != value);
        entries.sort_by_key(|&(plug, _)| plug);
        Ok(entries
            .into_iter()
            .map(|(plug, value)| format!("{}{}", letter_at(plug), letter_at(value)))
            .collect())
    }
}

fn single_letter(text: &str) -> Result<u8> {
    match (text.len(), parse_letter(text)) {
        (1, Some(index)) => Ok(index),
        _ => Err(EnigmaError::InvalidPlugSpec(format!(
            "invalid plug board letter {:?}",
            text
        ))),
    }
}

// `plug_board:` with no value is an unplugged board
fn nullable_plug_board<'de, D>(deserializer: D) -> std::result::Result<ExportedPlugBoard, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<ExportedPlugBoard>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serializable snapshot of a setting plus the generated display fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedSetting {
    /// Walzenlage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotors: Vec<ExportedRotor>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reflector: String,
    /// Steckerverbindungen
    #[serde(
        default,
        deserialize_with = "nullable_plug_board",
        skip_serializing_if = "ExportedPlugBoard::is_empty"
    )]
    pub plug_board: ExportedPlugBoard,

    // generated values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotor_info: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rotor_settings: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plugs: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

impl ExportedSetting {
    /// Decode a key document
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| EnigmaError::InvalidKey(format!("failed to parse setting: {}", e)))
    }

    /// YAML form of the whole structure
    pub fn print(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fill in the display fields and the key
    ///
    /// The summary line `"<reflector> | <rotors> | <plugs>"` is only
    /// provisional: the final key is the YAML dump of the complete structure,
    /// summary included.
    pub fn generate(&mut self) -> Result<()> {
        self.rotor_info = self
            .rotors
            .iter()
            .map(|rotor| format!("{}: {} + {}", rotor.name, rotor.position, rotor.ring_setting))
            .collect();

        let plugs = self.plug_board.plugs()?;
        self.plugs = plugs.join(" ");
        self.rotor_settings = self.rotor_info.join("; ");
        self.key = [
            self.reflector.as_str(),
            self.rotor_settings.as_str(),
            self.plugs.as_str(),
        ]
        .join(" | ");

        self.key = self.print()?;
        Ok(())
    }
}
