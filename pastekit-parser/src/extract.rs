//! Keyword attributes pulled out of a creature's unrecognised lines
//!
//! The lines stay in `other`; this pass only copies their values into the
//! dedicated fields. The first matching line wins.

use pastekit_spec::{Creature, DEFAULT_LEVEL};

const ABILITY: &str = "Ability:";
const LEVEL: &str = "Level:";
const SHINY: &str = "Shiny:";
const HIDDEN_POWER: &str = "Hidden Power:";
const TERA_TYPE: &str = "Tera Type:";
const NATURE: &str = "Nature";

fn first_value<'a>(lines: &'a [String], prefix: &str) -> Option<&'a str> {
    lines
        .iter()
        .find_map(|line| line.strip_prefix(prefix))
        .map(str::trim)
}

/// Fill ability, level, shiny, hidden power, tera type and nature from `other`
pub fn extract_keywords(creature: &mut Creature) {
    let lines = &creature.other;

    let ability = first_value(lines, ABILITY).unwrap_or_default().to_string();
    let level = first_value(lines, LEVEL)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_LEVEL);
    let shiny = first_value(lines, SHINY).unwrap_or_default().to_string();
    let hidden_power = first_value(lines, HIDDEN_POWER)
        .unwrap_or_default()
        .to_string();
    let tera_type = first_value(lines, TERA_TYPE).unwrap_or_default().to_string();
    let nature = lines
        .iter()
        .find(|line| line.contains(NATURE))
        .map(|line| line.replacen(" Nature", "", 1).trim().to_string())
        .unwrap_or_default();

    creature.ability = ability;
    creature.level = level;
    creature.shiny = shiny;
    creature.hidden_power = hidden_power;
    creature.tera_type = tera_type;
    creature.nature = nature;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_lines(lines: &[&str]) -> Creature {
        let mut c = Creature {
            other: lines.iter().map(|s| s.to_string()).collect(),
            ..Creature::default()
        };
        extract_keywords(&mut c);
        c
    }

    #[test]
    fn test_extracts_all_keywords() {
        let c = with_lines(&[
            "Ability: Cursed Body",
            "Level: 50",
            "Shiny: Yes",
            "Hidden Power: Fire",
            "Tera Type: Fairy",
            "Timid Nature",
        ]);
        assert_eq!(c.ability, "Cursed Body");
        assert_eq!(c.level, 50);
        assert_eq!(c.shiny, "Yes");
        assert_eq!(c.hidden_power, "Fire");
        assert_eq!(c.tera_type, "Fairy");
        assert_eq!(c.nature, "Timid");
        assert_eq!(c.other.len(), 6);
    }

    #[test]
    fn test_defaults() {
        let c = with_lines(&["Happiness: 0"]);
        assert_eq!(c.level, 100);
        assert!(c.ability.is_empty());
        assert!(c.nature.is_empty());
    }

    #[test]
    fn test_bad_level_keeps_default() {
        assert_eq!(with_lines(&["Level: fifty"]).level, 100);
    }

    #[test]
    fn test_first_line_wins() {
        let c = with_lines(&["Ability: Levitate", "Ability: Cursed Body"]);
        assert_eq!(c.ability, "Levitate");
    }
}
