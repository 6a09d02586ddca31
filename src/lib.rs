//! Enigma - Rotor Cipher Machine Emulator
//!
//! Emulates the three and four wheel Enigma machines, including the
//! double-step anomaly of the middle wheel, ring settings, reflectors and
//! the plug board. Settings come from a YAML key, from a key sheet in the
//! catalog, or are drawn at random.
//!
//! ## Signal Path
//!
//! Every key press first steps the wheels, then sends the letter through:
//!
//! ```text
//! Plug board → Rotors (fast → slow) → Reflector → Rotors (slow → fast) → Plug board
//! ```
//!
//! - **Plug board**: swaps pairs of letters, in and out
//! - **Rotors**: position and ring dependent substitution, stepped odometer style
//! - **Reflector**: fixed pairing without fixed points, which makes the
//!   machine its own inverse
//!
//! ## Example
//!
//! ```no_run
//! use enigma::{Catalog, Enigma, EnigmaOptions};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut machine = Enigma::new(&catalog, EnigmaOptions::default());
//!
//! let key = "rotors:\n  - I: 1\n  - II: 1\n  - III: 1\nreflector: B\n";
//! let cipher_text = machine.encrypt("AAAAA", key).unwrap();
//! assert_eq!(cipher_text, "BDZGO");
//!
//! let plain_text = machine.decrypt(&cipher_text, key).unwrap();
//! assert_eq!(plain_text, "AAAAA");
//! ```

pub mod alphabet;
pub mod catalog;
pub mod cli;
pub mod enigma;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod setting;

pub use crate::catalog::Catalog;
pub use crate::enigma::{sanitize, Direction, Enigma, EnigmaOptions};
pub use crate::error::{EnigmaError, Result};
pub use crate::key::ExportedSetting;
pub use crate::setting::Setting;
