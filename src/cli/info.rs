use crate::alphabet::letter_at;
use crate::catalog::Catalog;
use crate::error::Result;

/// Human readable listing of the wheels, reflectors and key sheet entries
pub fn show_catalog(catalog: &Catalog) -> Result<String> {
    let mut output = String::new();

    output.push_str("Enigma Catalog\n");
    output.push_str("==============\n\n");

    output.push_str("Rotors:\n");
    for rotor in catalog.rotors() {
        let wiring: String = rotor.forward_table().iter().map(|&v| letter_at(v)).collect();
        let notches: Vec<String> = rotor
            .notches()
            .iter()
            .map(|&n| letter_at(n).to_string())
            .collect();
        let notches = if notches.is_empty() {
            "-".to_string()
        } else {
            notches.join(",")
        };
        output.push_str(&format!("  {:<6} {}  notches: {}\n", rotor.name(), wiring, notches));
    }
    output.push('\n');

    output.push_str("Reflectors:\n");
    for reflector in catalog.reflectors() {
        let wiring: String = reflector.mapping().iter().map(|&v| letter_at(v)).collect();
        output.push_str(&format!("  {:<6} {}\n", reflector.name(), wiring));
    }
    output.push('\n');

    output.push_str(&format!("Settings: {}\n", catalog.settings().len()));
    for setting in catalog.settings() {
        let rotors: Vec<String> = setting
            .rotors
            .iter()
            .map(|rotor| format!("{}:{}", rotor.name(), rotor.ring_setting + 1))
            .collect();
        let plugs = setting.plug_board.to_string();
        output.push_str(&format!(
            "  {}  {}  {}  {}\n",
            setting.id_groups.join(" "),
            rotors.join(" "),
            setting.reflector.name(),
            if plugs.is_empty() { "-" } else { &plugs }
        ));
    }

    Ok(output)
}
