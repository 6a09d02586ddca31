//! Historical wheel, reflector and key sheet data
//!
//! The catalog is built once and passed around by reference. Every lookup
//! hands out an owned copy, so settings never share mutable wheel state.

use crate::error::{EnigmaError, Result};
use crate::key::RingValue;
use crate::pipeline::{PlugBoard, Reflector, Rotor, RotorStack};
use crate::setting::Setting;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const ROTORS_FILE: &str = "rotors.yaml";
pub const REFLECTORS_FILE: &str = "reflectors.yaml";
pub const SETTINGS_FILE: &str = "settings.yaml";

const ROTORS_YAML: &str = include_str!("../catalog/rotors.yaml");
const REFLECTORS_YAML: &str = include_str!("../catalog/reflectors.yaml");
const SETTINGS_YAML: &str = include_str!("../catalog/settings.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RotorEntry {
    mapping: String,
    #[serde(default)]
    notches: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingEntry {
    id_groups: Vec<String>,
    rotors: Vec<BTreeMap<String, RingValue>>,
    reflector: String,
    #[serde(default)]
    plug_board: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rotors: BTreeMap<String, Rotor>,
    reflectors: BTreeMap<String, Reflector>,
    settings: Vec<Setting>,
}

impl Catalog {
    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(ROTORS_YAML, REFLECTORS_YAML, SETTINGS_YAML)
    }

    /// Read catalog files from a directory; missing files fall back to the
    /// embedded data
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(EnigmaError::InvalidCatalog(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let rotors = read_or(dir, ROTORS_FILE, ROTORS_YAML)?;
        let reflectors = read_or(dir, REFLECTORS_FILE, REFLECTORS_YAML)?;
        let settings = read_or(dir, SETTINGS_FILE, SETTINGS_YAML)?;
        Self::from_yaml(&rotors, &reflectors, &settings)
    }

    pub fn from_yaml(rotors: &str, reflectors: &str, settings: &str) -> Result<Self> {
        let mut catalog = Self::default();

        let rotor_entries: BTreeMap<String, RotorEntry> = serde_yaml::from_str(rotors)?;
        for (name, entry) in rotor_entries {
            let notches: Vec<&str> = entry.notches.iter().map(String::as_str).collect();
            let rotor = Rotor::new(&name, &entry.mapping, &notches)?;
            catalog.rotors.insert(rotor.name().to_string(), rotor);
        }

        let reflector_entries: BTreeMap<String, String> = serde_yaml::from_str(reflectors)?;
        for (name, wiring) in reflector_entries {
            let reflector = Reflector::new(&name, &wiring)?;
            catalog
                .reflectors
                .insert(reflector.name().to_string(), reflector);
        }

        let setting_entries: Vec<SettingEntry> = serde_yaml::from_str(settings)?;
        for entry in setting_entries {
            let setting = catalog.build_setting(entry)?;
            catalog.settings.push(setting);
        }

        info!(
            rotors = catalog.rotors.len(),
            reflectors = catalog.reflectors.len(),
            settings = catalog.settings.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn build_setting(&self, entry: SettingEntry) -> Result<Setting> {
        let mut rotors = RotorStack::default();
        for item in &entry.rotors {
            if item.len() != 1 {
                return Err(EnigmaError::InvalidCatalog(format!(
                    "setting {:?}: rotor entry with {} items, expected single item",
                    entry.id_groups,
                    item.len()
                )));
            }
            for (name, ring) in item {
                let mut rotor = self.rotor(name)?;
                rotor.ring_setting = ring.index()?;
                rotors.push(rotor);
            }
        }

        let reflector = self.reflector(&entry.reflector)?;
        let plug_board = match &entry.plug_board {
            Some(spec) => PlugBoard::parse(spec)?,
            None => PlugBoard::default(),
        };

        let mut setting = Setting::new(rotors, reflector, plug_board);
        setting.id_groups = entry
            .id_groups
            .iter()
            .map(|group| group.to_uppercase())
            .collect();
        setting.validate(false).map_err(|e| {
            EnigmaError::InvalidCatalog(format!("setting {:?}: {}", entry.id_groups, e))
        })?;
        Ok(setting)
    }

    /// Fresh copy of a named wheel
    pub fn rotor(&self, name: &str) -> Result<Rotor> {
        self.rotors
            .get(&name.to_uppercase())
            .cloned()
            .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))
    }

    pub fn reflector(&self, name: &str) -> Result<Reflector> {
        self.reflectors
            .get(&name.to_uppercase())
            .cloned()
            .ok_or_else(|| EnigmaError::UnknownReflector(name.to_string()))
    }

    /// Key sheet entry carrying the given ID group
    pub fn setting(&self, id_group: &str) -> Result<Setting> {
        let wanted = id_group.trim().to_uppercase();
        self.settings
            .iter()
            .find(|setting| setting.id_groups.iter().any(|group| *group == wanted))
            .cloned()
            .ok_or_else(|| EnigmaError::UnknownSetting(id_group.to_string()))
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn rotor_names(&self) -> Vec<&str> {
        self.rotors.keys().map(String::as_str).collect()
    }

    pub fn reflector_names(&self) -> Vec<&str> {
        self.reflectors.keys().map(String::as_str).collect()
    }

    pub fn rotors(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.values()
    }

    pub fn reflectors(&self) -> impl Iterator<Item = &Reflector> {
        self.reflectors.values()
    }
}

fn read_or(dir: &Path, file: &str, fallback: &str) -> Result<String> {
    let path = dir.join(file);
    if path.exists() {
        debug!(path = %path.display(), "reading catalog file");
        Ok(fs::read_to_string(&path)?)
    } else {
        debug!(file, "catalog file missing, using embedded data");
        Ok(fallback.to_string())
    }
}
