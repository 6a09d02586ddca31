use crate::catalog::Catalog;
use crate::enigma::{sanitize, Direction, Enigma, EnigmaOptions};
use crate::error::{EnigmaError, Result};
use crate::pipeline::PlugBoard;
use crate::setting::Setting;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Where the machine setting comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Key document text
    Text(String),
    /// ID group of a catalog setting
    Setting(String),
}

/// Options for the encrypt and decrypt commands
#[derive(Debug, Clone, Default)]
pub struct CryptOptions {
    pub key: Option<KeySource>,
    /// Replaces the plug board of the key when not empty
    pub plug_board: String,
    pub copy_extra: bool,
    pub preserve_case: bool,
    /// Rewrite punctuation and drop everything else before enciphering
    pub sanitize: bool,
}

impl CryptOptions {
    fn machine_options(&self) -> EnigmaOptions {
        EnigmaOptions {
            copy_extra: self.copy_extra,
            preserve_case: self.preserve_case,
        }
    }

    fn resolve_setting(&self, enigma: &Enigma<'_>) -> Result<Setting> {
        let key = self.key.as_ref().ok_or(EnigmaError::MissingSetting)?;
        match key {
            KeySource::Text(text) => enigma.read_key_and_plug_board(text, &self.plug_board),
            KeySource::Setting(id_group) => {
                let mut setting = Setting::from_catalog(enigma.catalog(), id_group)?;
                if !self.plug_board.trim().is_empty() {
                    setting.plug_board = PlugBoard::parse(&self.plug_board)?;
                }
                Ok(setting)
            }
        }
    }
}

/// Run text through the machine in the given direction
///
/// Without `copy_extra` the machine only accepts letters, so whitespace
/// (including the grouping of earlier cipher text) is dropped first.
pub fn crypt_data(
    catalog: &Catalog,
    text: &str,
    options: &CryptOptions,
    direction: Direction,
) -> Result<String> {
    let mut enigma = Enigma::new(catalog, options.machine_options());
    let setting = options.resolve_setting(&enigma)?;

    let text = if options.sanitize {
        sanitize(text)
    } else if !options.copy_extra {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        text.to_string()
    };

    match direction {
        Direction::Encrypt => enigma.encrypt_with_setting(&text, &setting),
        Direction::Decrypt => enigma.decrypt_with_setting(&text, &setting),
    }
}

pub fn encrypt_data(catalog: &Catalog, plain_text: &str, options: &CryptOptions) -> Result<String> {
    crypt_data(catalog, plain_text, options, Direction::Encrypt)
}

pub fn decrypt_data(catalog: &Catalog, cipher_text: &str, options: &CryptOptions) -> Result<String> {
    crypt_data(catalog, cipher_text, options, Direction::Decrypt)
}

/// Encrypt a file (or stdin when `input_path` is `None`) into a file (or
/// stdout). Returns the number of characters written.
pub fn encrypt_file(
    catalog: &Catalog,
    input_path: Option<&Path>,
    output_path: Option<&Path>,
    options: &CryptOptions,
) -> Result<usize> {
    crypt_file(catalog, input_path, output_path, options, Direction::Encrypt)
}

pub fn decrypt_file(
    catalog: &Catalog,
    input_path: Option<&Path>,
    output_path: Option<&Path>,
    options: &CryptOptions,
) -> Result<usize> {
    crypt_file(catalog, input_path, output_path, options, Direction::Decrypt)
}

fn crypt_file(
    catalog: &Catalog,
    input_path: Option<&Path>,
    output_path: Option<&Path>,
    options: &CryptOptions,
    direction: Direction,
) -> Result<usize> {
    let input = read_input(input_path)?;
    let output = crypt_data(catalog, &input, options, direction)?;
    write_output(output_path, &output)?;
    debug!(%direction, characters = output.len(), "written");
    Ok(output.chars().count())
}

/// Whole input as text; `None` reads stdin
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Write text to a file, or to stdout followed by a newline when `path` is
/// `None`
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const KEY: &str = "rotors:\n  - I: A\n  - II: A\n  - III: A\nreflector: B\n";

    fn options(key: KeySource) -> CryptOptions {
        CryptOptions {
            key: Some(key),
            ..Default::default()
        }
    }

    #[test]
    fn test_encrypt_data_with_key_text() {
        let catalog = Catalog::builtin().unwrap();
        let options = options(KeySource::Text(KEY.into()));
        assert_eq!(encrypt_data(&catalog, "AAAAA", &options).unwrap(), "BDZGO");
        assert_eq!(decrypt_data(&catalog, "BDZGO\n", &options).unwrap(), "AAAAA");
    }

    #[test]
    fn test_encrypt_data_with_catalog_setting() {
        let catalog = Catalog::builtin().unwrap();
        let options = options(KeySource::Setting("wld".into()));
        assert_eq!(encrypt_data(&catalog, "AAAAA", &options).unwrap(), "BDZGO");
    }

    #[test]
    fn test_plug_board_override_on_catalog_setting() {
        let catalog = Catalog::builtin().unwrap();
        let mut options = options(KeySource::Setting("AJF".into()));
        let plain = encrypt_data(&catalog, "HELLOWORLD", &options).unwrap();
        options.plug_board = "AB CD".into();
        let plugged = encrypt_data(&catalog, "HELLOWORLD", &options).unwrap();
        assert_ne!(plain, plugged);
        assert_eq!(
            decrypt_data(&catalog, &plugged, &options).unwrap(),
            "HELLO WORLD"
        );
    }

    #[test]
    fn test_grouped_cipher_text_decrypts() {
        let catalog = Catalog::builtin().unwrap();
        let options = options(KeySource::Setting("LGO".into()));
        let plain = "ATTACKATDAWNXREPEATXATTACKATDAWN";
        let encrypted = encrypt_data(&catalog, plain, &options).unwrap();
        assert!(encrypted.contains(' '));
        let decrypted = decrypt_data(&catalog, &encrypted, &options).unwrap();
        assert_eq!(decrypted.replace(' ', ""), plain);
    }

    #[test]
    fn test_sanitize_before_encrypt() {
        let catalog = Catalog::builtin().unwrap();
        let mut options = options(KeySource::Text(KEY.into()));
        options.sanitize = true;
        let encrypted = encrypt_data(&catalog, "DON'T, STOP.", &options).unwrap();
        options.sanitize = false;
        let decrypted = decrypt_data(&catalog, &encrypted, &options).unwrap();
        assert_eq!(decrypted, "DONTY STOPX");
    }

    #[test]
    fn test_missing_key() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            encrypt_data(&catalog, "A", &CryptOptions::default()),
            Err(EnigmaError::MissingSetting)
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("plain.txt");
        let cipher_path = dir.path().join("cipher.txt");
        let output_path = dir.path().join("output.txt");

        let text = "Attack at dawn.\nRepeat: attack at dawn!\n";
        std::fs::write(&input_path, text).unwrap();

        let catalog = Catalog::builtin().unwrap();
        let options = CryptOptions {
            key: Some(KeySource::Setting("BXM".into())),
            copy_extra: true,
            preserve_case: true,
            ..Default::default()
        };
        let written = encrypt_file(&catalog, Some(&input_path), Some(&cipher_path), &options)
            .unwrap();
        assert_eq!(written, text.chars().count());

        let cipher = std::fs::read_to_string(&cipher_path).unwrap();
        assert_ne!(cipher, text);
        assert_eq!(cipher.matches('\n').count(), 2);

        decrypt_file(&catalog, Some(&cipher_path), Some(&output_path), &options).unwrap();
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), text);
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempdir().unwrap();
        let catalog = Catalog::builtin().unwrap();
        let options = options(KeySource::Text(KEY.into()));
        assert!(matches!(
            encrypt_file(&catalog, Some(&dir.path().join("nope")), None, &options),
            Err(EnigmaError::Io(_))
        ));
    }
}
