//! The machine: one setting, one character at a time

use crate::alphabet::{index_of, letter_at};
use crate::catalog::Catalog;
use crate::error::{EnigmaError, Result};
use crate::key::ExportedSetting;
use crate::pipeline::PlugBoard;
use crate::setting::Setting;
use tracing::debug;

/// Cipher text is grouped in blocks of five letters
const GROUP_SIZE: usize = 5;
/// and wrapped every eighty letters
const LINE_SIZE: usize = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnigmaOptions {
    /// Pass anything that is not a letter through unchanged, without
    /// stepping and without grouping the output
    pub copy_extra: bool,
    /// Keep lowercase input letters lowercase in the output
    pub preserve_case: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Encrypt => write!(f, "encrypt"),
            Direction::Decrypt => write!(f, "decrypt"),
        }
    }
}

/// Either idle (no setting) or keyed
///
/// The `encrypt*`/`decrypt*` calls always start over from a fresh copy of the
/// given key, so repeating a call repeats the result. [`Enigma::process`]
/// continues from whatever state the wheels are in.
#[derive(Debug)]
pub struct Enigma<'c> {
    catalog: &'c Catalog,
    options: EnigmaOptions,
    setting: Option<Setting>,
}

impl<'c> Enigma<'c> {
    pub fn new(catalog: &'c Catalog, options: EnigmaOptions) -> Self {
        Self {
            catalog,
            options,
            setting: None,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Current setting, wheels in their present positions
    pub fn setting(&self) -> Option<&Setting> {
        self.setting.as_ref()
    }

    /// Key the machine with its own copy of `setting`
    ///
    /// The setting is validated first; an invalid one leaves the machine idle.
    pub fn load(&mut self, setting: &Setting) -> Result<()> {
        setting.validate(true)?;
        debug!(
            rotors = %setting.rotors.iter().map(|r| r.name()).collect::<Vec<_>>().join(","),
            window = %setting.rotors.window(),
            reflector = setting.reflector.name(),
            plugs = %setting.plug_board,
            "setting loaded"
        );
        self.setting = Some(setting.clone());
        Ok(())
    }

    /// Back to idle
    pub fn reset(&mut self) {
        self.setting = None;
    }

    /// Run text through the keyed machine, continuing from its current state
    pub fn process(&mut self, text: &str) -> Result<String> {
        let options = self.options;
        let setting = self.setting.as_mut().ok_or(EnigmaError::MissingSetting)?;

        let mut output = String::with_capacity(text.len() + text.len() / GROUP_SIZE);
        for (index, character) in text.chars().enumerate() {
            let letter = if character.is_ascii() {
                index_of(character as u8)
            } else {
                None
            };

            if options.copy_extra {
                if letter.is_none() {
                    output.push(character);
                    continue;
                }
            } else if index > 0 {
                if index % GROUP_SIZE == 0 {
                    output.push(' ');
                }
                if index % LINE_SIZE == 0 {
                    output.push('\n');
                }
            }

            let letter = letter.ok_or(EnigmaError::InvalidCharacter(character))?;
            setting.rotors.step();
            let mut substituted = letter_at(setting.substitute(letter)?);
            if options.preserve_case && character.is_ascii_lowercase() {
                substituted = substituted.to_ascii_lowercase();
            }
            output.push(substituted);
        }

        debug!(
            letters = text.len(),
            window = %setting.rotors.window(),
            "message processed"
        );
        Ok(output)
    }

    pub fn encrypt(&mut self, plain_text: &str, key: &str) -> Result<String> {
        self.encrypt_with_plug_board(plain_text, key, "")
    }

    /// Encrypt with a key, replacing its plug board when `plug_board` is not
    /// empty
    pub fn encrypt_with_plug_board(
        &mut self,
        plain_text: &str,
        key: &str,
        plug_board: &str,
    ) -> Result<String> {
        let setting = self.read_key_and_plug_board(key, plug_board)?;
        self.run(plain_text, &setting, Direction::Encrypt)
    }

    pub fn encrypt_with_setting(&mut self, plain_text: &str, setting: &Setting) -> Result<String> {
        self.run(plain_text, setting, Direction::Encrypt)
    }

    pub fn decrypt(&mut self, cipher_text: &str, key: &str) -> Result<String> {
        self.decrypt_with_plug_board(cipher_text, key, "")
    }

    pub fn decrypt_with_plug_board(
        &mut self,
        cipher_text: &str,
        key: &str,
        plug_board: &str,
    ) -> Result<String> {
        let setting = self.read_key_and_plug_board(key, plug_board)?;
        self.run(cipher_text, &setting, Direction::Decrypt)
    }

    pub fn decrypt_with_setting(&mut self, cipher_text: &str, setting: &Setting) -> Result<String> {
        self.run(cipher_text, setting, Direction::Decrypt)
    }

    /// Random key from the catalog, as a complete key document
    pub fn generate_key(&self) -> Result<String> {
        let setting =
            Setting::random(self.catalog).map_err(|e| EnigmaError::KeyGeneration(Box::new(e)))?;
        let mut exported = setting.export();
        exported
            .generate()
            .map_err(|e| EnigmaError::KeyGeneration(Box::new(e)))?;
        Ok(exported.key)
    }

    pub fn sanitize(&self, text: &str) -> String {
        sanitize(text)
    }

    /// Parse and import a key; a non-empty `plug_board` replaces the key's
    /// own plug board
    pub fn read_key_and_plug_board(&self, key: &str, plug_board: &str) -> Result<Setting> {
        let exported = ExportedSetting::parse(key)?;
        let mut setting = Setting::import(self.catalog, &exported)?;
        if !plug_board.trim().is_empty() {
            setting.plug_board = PlugBoard::parse(plug_board)?;
        }
        Ok(setting)
    }

    fn run(&mut self, text: &str, setting: &Setting, direction: Direction) -> Result<String> {
        self.reset();
        self.load(setting)?;
        debug!(%direction, letters = text.len(), "starting");
        self.process(text)
    }
}

/// Rewrite punctuation the way radio operators did and drop everything else
/// that is not an uppercase letter
///
/// `?` → `L`, `,` → `Y`, `.` → `X`, `:` → `XX`, `"` → `J`, `(` and `)` → `KK`.
pub fn sanitize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '?' => output.push('L'),
            ',' => output.push('Y'),
            '.' => output.push('X'),
            ':' => output.push_str("XX"),
            '"' => output.push('J'),
            '(' | ')' => output.push_str("KK"),
            'A'..='Z' => output.push(character),
            _ => {}
        }
    }
    output
}
