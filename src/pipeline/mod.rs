pub mod plug_board;
pub mod reflector;
pub mod rotor;
pub mod stack;

pub use plug_board::*;
pub use reflector::*;
pub use rotor::*;
pub use stack::*;
