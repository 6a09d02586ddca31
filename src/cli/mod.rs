pub mod crypt;
pub mod info;
pub mod key;

pub use crypt::*;
pub use info::*;
pub use key::*;
