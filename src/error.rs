use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnigmaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Rotor {0:?} not found")]
    UnknownRotor(String),

    #[error("Reflector {0:?} not found")]
    UnknownReflector(String),

    #[error("Setting {0:?} not found")]
    UnknownSetting(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid plug board: {0}")]
    InvalidPlugSpec(String),

    #[error("No setting loaded")]
    MissingSetting,

    #[error("Reflection of letter index {0} failed")]
    InvalidReflection(usize),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Failed to generate key: {0}")]
    KeyGeneration(#[source] Box<EnigmaError>),
}

pub type Result<T> = std::result::Result<T, EnigmaError>;
