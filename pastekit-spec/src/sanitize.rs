//! # Sanitization
//!
//! Every free-text field is HTML-escaped before it leaves the parser, so
//! renderers can interpolate values without further checks. Apostrophes are
//! left alone; species names such as `Farfetch'd` carry them.

use crate::model::{Creature, Paste, PasteSet};

/// Escape `&`, `<`, `>` and `"`
pub fn sanitize_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn sanitize_in_place(field: &mut String) {
    if field.contains(['&', '<', '>', '"']) {
        *field = sanitize_html(field);
    }
}

impl Creature {
    /// Escape every free-text field of the creature
    ///
    /// Sprite paths and item image declarations are generated, not user
    /// text, and are left as-is.
    pub fn sanitize(&mut self) {
        for field in [
            &mut self.nickname,
            &mut self.name,
            &mut self.type1,
            &mut self.type2,
            &mut self.item,
            &mut self.ability,
            &mut self.shiny,
            &mut self.hidden_power,
            &mut self.tera_type,
            &mut self.nature,
        ] {
            sanitize_in_place(field);
        }
        for mv in &mut self.moves {
            sanitize_in_place(&mut mv.name);
            sanitize_in_place(&mut mv.move_type);
        }
        self.other.iter_mut().for_each(sanitize_in_place);
    }
}

impl Paste {
    /// Escape every free-text field of the paste and its sets
    pub fn sanitize(&mut self) {
        for field in [
            &mut self.title,
            &mut self.author,
            &mut self.notes,
            &mut self.format,
            &mut self.rental,
        ] {
            sanitize_in_place(field);
        }
        for set in &mut self.sets {
            match set {
                PasteSet::Creature(creature) => creature.sanitize(),
                PasteSet::Text(text) => sanitize_in_place(text),
            }
        }
    }
}
