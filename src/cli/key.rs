use crate::catalog::Catalog;
use crate::error::{EnigmaError, Result};
use crate::key::ExportedSetting;
use crate::setting::Setting;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for KeyFormat {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(KeyFormat::Yaml),
            "json" => Ok(KeyFormat::Json),
            _ => Err(EnigmaError::InvalidKey(format!("unknown key format: {}", s))),
        }
    }
}

/// Random key; the YAML form is the complete key document
pub fn generate_key(catalog: &Catalog, format: KeyFormat) -> Result<String> {
    let setting = Setting::random(catalog).map_err(|e| EnigmaError::KeyGeneration(Box::new(e)))?;
    render(&setting, format).map_err(|e| EnigmaError::KeyGeneration(Box::new(e)))
}

/// Key for a catalog setting, wheels at their start positions
pub fn export_setting(catalog: &Catalog, id_group: &str, format: KeyFormat) -> Result<String> {
    let setting = Setting::from_catalog(catalog, id_group)?;
    render(&setting, format)
}

fn render(setting: &Setting, format: KeyFormat) -> Result<String> {
    let mut exported = setting.export();
    exported.generate()?;
    match format {
        KeyFormat::Yaml => Ok(exported.key),
        KeyFormat::Json => exported.to_json(),
    }
}
