use crate::alphabet::{letter_at, parse_letter, random_int, LETTERS};
use crate::catalog::Catalog;
use crate::error::{EnigmaError, Result};
use crate::key::{ExportedPlugBoard, ExportedRotor, ExportedSetting};
use crate::pipeline::{PlugBoard, Reflector, RotorStack};

/// A complete machine configuration
///
/// A setting owns its rotors, reflector and plug board outright. Cloning it
/// (derived `Clone` or [`Setting::try_clone`]) never shares wheel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    /// Kenngruppen, only present for key sheet entries
    pub id_groups: Vec<String>,
    /// Walzenlage
    pub rotors: RotorStack,
    pub reflector: Reflector,
    /// Steckerverbindungen
    pub plug_board: PlugBoard,
}

impl Setting {
    pub fn new(rotors: RotorStack, reflector: Reflector, plug_board: PlugBoard) -> Self {
        Self {
            id_groups: Vec::new(),
            rotors,
            reflector,
            plug_board,
        }
    }

    /// Key sheet entry identified by one of its ID groups
    pub fn from_catalog(catalog: &Catalog, id_group: &str) -> Result<Self> {
        catalog.setting(id_group)
    }

    /// Random key sheet entry with random wheel positions
    ///
    /// Ring settings keep the key sheet values.
    pub fn random(catalog: &Catalog) -> Result<Self> {
        let settings = catalog.settings();
        if settings.is_empty() {
            return Err(EnigmaError::InvalidCatalog("no settings to choose from".into()));
        }

        let mut setting = settings[random_int(0, settings.len() - 1)].clone();
        for rotor in setting.rotors.iter_mut() {
            rotor.position = random_int(0, LETTERS - 1) as u8;
        }
        Ok(setting)
    }

    pub fn export(&self) -> ExportedSetting {
        let rotors = self
            .rotors
            .iter()
            .map(|rotor| ExportedRotor {
                name: rotor.name().to_string(),
                position: letter_at(rotor.position).to_string(),
                ring_setting: letter_at(rotor.ring_setting).to_string(),
            })
            .collect();

        ExportedSetting {
            rotors,
            reflector: self.reflector.name().to_string(),
            plug_board: ExportedPlugBoard::from_plug_board(&self.plug_board),
            ..Default::default()
        }
    }

    /// Rebuild a setting from its exported form, resolving wheel and
    /// reflector names against the catalog
    pub fn import(catalog: &Catalog, exported: &ExportedSetting) -> Result<Self> {
        let mut rotors = RotorStack::default();
        for exported_rotor in &exported.rotors {
            let mut rotor = catalog.rotor(&exported_rotor.name)?;
            rotor.position = parse_letter(&exported_rotor.position).ok_or_else(|| {
                EnigmaError::InvalidKey(format!(
                    "invalid position {:?} for rotor {}",
                    exported_rotor.position, exported_rotor.name
                ))
            })?;
            rotor.ring_setting = parse_letter(&exported_rotor.ring_setting).ok_or_else(|| {
                EnigmaError::InvalidKey(format!(
                    "invalid ring setting {:?} for rotor {}",
                    exported_rotor.ring_setting, exported_rotor.name
                ))
            })?;
            rotors.push(rotor);
        }

        let reflector = catalog.reflector(&exported.reflector)?;
        let plug_board = exported.plug_board.to_plug_board()?;

        let setting = Self::new(rotors, reflector, plug_board);
        setting.validate(true)?;
        Ok(setting)
    }

    /// Independent copy made by exporting and importing again
    pub fn try_clone(&self, catalog: &Catalog) -> Result<Self> {
        let mut setting = Self::import(catalog, &self.export())?;
        setting.id_groups = self.id_groups.clone();
        Ok(setting)
    }

    /// Check every invariant; ID groups are only required for settings that
    /// were not imported from a key
    pub fn validate(&self, imported: bool) -> Result<()> {
        // ID groups
        if !imported {
            if self.id_groups.len() != 4 {
                return Err(invalid(format!(
                    "invalid id_groups length {}, expected 4",
                    self.id_groups.len()
                )));
            }
            for id_group in &self.id_groups {
                if id_group.chars().count() != 3 {
                    return Err(invalid(format!(
                        "invalid id_group {:?}, expected 3 characters",
                        id_group
                    )));
                }
            }
        }

        // Rotors
        if !(3..=4).contains(&self.rotors.len()) {
            return Err(invalid(format!(
                "invalid rotors length {}, expected 3 or 4",
                self.rotors.len()
            )));
        }
        for rotor in self.rotors.iter() {
            if rotor.ring_setting as usize >= LETTERS {
                return Err(invalid(format!(
                    "invalid ring {} on rotor {}, expected 0-25",
                    rotor.ring_setting,
                    rotor.name()
                )));
            }
            if rotor.position as usize >= LETTERS {
                return Err(invalid(format!(
                    "invalid position {} on rotor {}, expected 0-25",
                    rotor.position,
                    rotor.name()
                )));
            }
            if !rotor.is_consistent() {
                return Err(invalid(format!(
                    "rotor {} mapping is not a complete permutation",
                    rotor.name()
                )));
            }
        }

        // Reflector
        if let Err(reason) = self.reflector.check_involution() {
            return Err(invalid(format!(
                "reflector {}: {}",
                self.reflector.name(),
                reason
            )));
        }

        // Plug board
        if !self.plug_board.is_involution() {
            return Err(invalid("plug board mapping is not symmetric".into()));
        }

        Ok(())
    }

    /// Send one letter through plug board, wheels, reflector and back
    ///
    /// The wheels are not stepped here.
    pub fn substitute(&self, letter: u8) -> Result<u8> {
        let signal = self.plug_board.transform(letter);
        let signal = self.rotors.forward(signal);
        let signal = self.reflector.reflect(signal)?;
        let signal = self.rotors.reverse(signal);
        Ok(self.plug_board.transform(signal))
    }
}

fn invalid(reason: String) -> EnigmaError {
    EnigmaError::InvalidSetting(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn reference(catalog: &Catalog) -> Setting {
        let mut rotors = RotorStack::default();
        for (name, position, ring) in [("V", b'Z', b'L'), ("I", b'H', b'Y'), ("II", b'J', b'H')] {
            let mut rotor = catalog.rotor(name).unwrap();
            rotor.position = position - b'A';
            rotor.ring_setting = ring - b'A';
            rotors.push(rotor);
        }
        Setting::new(
            rotors,
            catalog.reflector("B").unwrap(),
            PlugBoard::parse("DZ GB ME NL PY RQ SJ TF WI XV").unwrap(),
        )
    }

    #[test]
    fn test_from_catalog() {
        let catalog = catalog();
        let setting = Setting::from_catalog(&catalog, "lgo").unwrap();
        assert_eq!(setting.id_groups, vec!["DQX", "LGO", "PVA", "TUK"]);
        let names: Vec<&str> = setting.rotors.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["II", "V", "III"]);
        // Rings are 1-based in the key sheet
        assert_eq!(setting.rotors.rotors()[0].ring_setting, 23);
        assert_eq!(setting.rotors.positions(), vec![0, 0, 0]);
        assert_eq!(setting.plug_board.to_string(), "AM FI NV PS TU WZ");
        setting.validate(false).unwrap();
    }

    #[test]
    fn test_from_catalog_unknown() {
        let catalog = catalog();
        assert!(matches!(
            Setting::from_catalog(&catalog, "QQQ"),
            Err(EnigmaError::UnknownSetting(_))
        ));
    }

    #[test]
    fn test_random_keeps_rings_and_catalog_untouched() {
        let catalog = catalog();
        for _ in 0..50 {
            let setting = Setting::random(&catalog).unwrap();
            let template = catalog.setting(&setting.id_groups[0]).unwrap();
            assert_eq!(setting.rotors.len(), template.rotors.len());
            for (rotor, template_rotor) in setting.rotors.iter().zip(template.rotors.iter()) {
                assert_eq!(rotor.name(), template_rotor.name());
                assert_eq!(rotor.ring_setting, template_rotor.ring_setting);
                assert!((rotor.position as usize) < LETTERS);
            }
        }
        for template in catalog.settings() {
            assert!(template.rotors.positions().iter().all(|&p| p == 0));
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let catalog = catalog();
        let setting = reference(&catalog);
        let exported = setting.export();
        assert_eq!(exported.rotors[0].name, "V");
        assert_eq!(exported.rotors[0].position, "Z");
        assert_eq!(exported.rotors[0].ring_setting, "L");
        assert_eq!(exported.reflector, "B");

        let imported = Setting::import(&catalog, &exported).unwrap();
        assert_eq!(imported, setting);
        assert_eq!(imported.plug_board.pairs(), setting.plug_board.pairs());
    }

    #[test]
    fn test_import_through_key_text() {
        let catalog = catalog();
        let setting = reference(&catalog);
        let mut exported = setting.export();
        exported.generate().unwrap();
        let parsed = ExportedSetting::parse(&exported.key).unwrap();
        let imported = Setting::import(&catalog, &parsed).unwrap();
        assert_eq!(imported.rotors, setting.rotors);
        assert_eq!(imported.reflector.name(), "B");
        assert_eq!(imported.plug_board, setting.plug_board);
    }

    #[test]
    fn test_import_unknown_names() {
        let catalog = catalog();
        let mut exported = reference(&catalog).export();
        exported.rotors[1].name = "IX".into();
        assert!(matches!(
            Setting::import(&catalog, &exported),
            Err(EnigmaError::UnknownRotor(_))
        ));

        let mut exported = reference(&catalog).export();
        exported.reflector = "D".into();
        assert!(matches!(
            Setting::import(&catalog, &exported),
            Err(EnigmaError::UnknownReflector(_))
        ));
    }

    #[test]
    fn test_import_rejects_rotor_count() {
        let catalog = catalog();
        let mut exported = reference(&catalog).export();
        exported.rotors.truncate(2);
        assert!(matches!(
            Setting::import(&catalog, &exported),
            Err(EnigmaError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_try_clone_is_independent() {
        let catalog = catalog();
        let setting = Setting::from_catalog(&catalog, "BXM").unwrap();
        let mut copy = setting.try_clone(&catalog).unwrap();
        assert_eq!(copy, setting);

        for _ in 0..30 {
            copy.rotors.step();
        }
        assert_ne!(copy.rotors.positions(), setting.rotors.positions());
        assert_eq!(setting.rotors.positions(), vec![0, 0, 0]);
    }

    #[test]
    fn test_validate_rotor_count() {
        let catalog = catalog();
        let mut setting = reference(&catalog);
        setting.validate(true).unwrap();

        let mut two = setting.clone();
        two.rotors = setting.rotors.iter().take(2).cloned().collect();
        assert!(matches!(two.validate(true), Err(EnigmaError::InvalidSetting(_))));

        let mut five = setting.clone();
        five.rotors = setting
            .rotors
            .iter()
            .chain(setting.rotors.iter().take(2))
            .cloned()
            .collect();
        assert!(matches!(five.validate(true), Err(EnigmaError::InvalidSetting(_))));

        setting.rotors.push(catalog.rotor("BETA").unwrap());
        setting.validate(true).unwrap();
    }

    #[test]
    fn test_validate_ring_and_position_range() {
        let catalog = catalog();
        let mut setting = reference(&catalog);
        setting.rotors.iter_mut().next().unwrap().ring_setting = 26;
        let err = setting.validate(true).unwrap_err();
        assert!(err.to_string().contains("ring"));

        let mut setting = reference(&catalog);
        setting.rotors.iter_mut().last().unwrap().position = 26;
        let err = setting.validate(true).unwrap_err();
        assert!(err.to_string().contains("position"));
    }

    #[test]
    fn test_validate_id_groups_only_when_not_imported() {
        let catalog = catalog();
        let mut setting = reference(&catalog);
        setting.validate(true).unwrap();
        assert!(setting.validate(false).is_err());

        setting.id_groups = vec!["ABC".into(), "DEF".into(), "GHI".into(), "JKLM".into()];
        assert!(setting.validate(false).is_err());

        setting.id_groups[3] = "JKL".into();
        setting.validate(false).unwrap();
    }

    #[test]
    fn test_substitute_is_reciprocal() {
        let catalog = catalog();
        let setting = reference(&catalog);
        for letter in 0..LETTERS as u8 {
            let out = setting.substitute(letter).unwrap();
            assert_ne!(out, letter);
            assert_eq!(setting.substitute(out).unwrap(), letter);
        }
    }
}
