use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Number of letters on every wheel, reflector and plug board
pub const LETTERS: usize = 26;

/// The machine alphabet, index 0 = 'A'
pub const UPPER_CASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Case-folded alphabet index of an ASCII letter
pub fn index_of(byte: u8) -> Option<u8> {
    let upper = byte.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(upper - b'A')
    } else {
        None
    }
}

/// Uppercase letter for an alphabet index
pub fn letter_at(index: u8) -> char {
    debug_assert!((index as usize) < LETTERS);
    char::from(UPPER_CASE.as_bytes()[index as usize % LETTERS])
}

/// Index of the first character of `text`, case-insensitive
pub fn parse_letter(text: &str) -> Option<u8> {
    text.bytes().next().and_then(index_of)
}

/// Uniform integer in `[min, max]`
///
/// The generator is seeded from the operating system CSPRNG. If that source
/// fails, a clock-seeded generator is used instead; the result is then NOT
/// cryptographically random.
pub fn random_int(min: usize, max: usize) -> usize {
    let (min, max) = if min > max { (max, min) } else { (min, max) };

    let mut seed = [0u8; 32];
    let mut rng = match OsRng.try_fill_bytes(&mut seed) {
        Ok(()) => StdRng::from_seed(seed),
        Err(e) => {
            warn!(error = %e, "secure random source failed, falling back to clock seed");
            StdRng::seed_from_u64(clock_seed())
        }
    };

    rng.gen_range(min..=max)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
