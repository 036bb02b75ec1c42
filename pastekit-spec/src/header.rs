//! Optional metadata header of a framed paste
//!
//! ```text
//! {"title": "Rain", "author": "ash", "ots": true}
//! -----
//! Pelipper @ Damp Rock
//! ...
//! ```
//!
//! Framing only wraps payloads recovered from a sealed envelope; plain paste
//! text is never split. The JSON object runs up to the first line that is
//! exactly `-----`. A header that does not parse as a JSON object is not a
//! header, and the whole input is treated as the paste body.

use tracing::debug;

use crate::model::{Metadata, Paste, PasteSet};
use crate::sanitize::sanitize_html;

/// Line separating the metadata object from the paste body
pub const HEADER_SEPARATOR: &str = "-----";

/// Replace `\r\n` and lone `\r` with `\n`
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split a normalised framed payload into its header (if any) and body
pub fn split_header(text: &str) -> (Option<Metadata>, &str) {
    if !text.trim_start().starts_with('{') {
        return (None, text);
    }

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end_matches('\n') == HEADER_SEPARATOR {
            let json = &text[..offset];
            let body = &text[offset + line.len()..];
            return match serde_json::from_str::<Metadata>(json) {
                Ok(meta) => (Some(meta), body),
                Err(err) => {
                    debug!(%err, "metadata header rejected, treating input as body");
                    (None, text)
                }
            };
        }
        offset += line.len();
    }

    (None, text)
}

impl Paste {
    /// Copy header fields onto an already parsed (and sanitized) paste
    pub fn apply_metadata(&mut self, meta: Metadata) {
        self.title = sanitize_html(&meta.title);
        self.author = sanitize_html(&meta.author);
        self.notes = sanitize_html(&meta.notes);
        self.format = sanitize_html(&meta.format);
        self.rental = sanitize_html(&meta.rental);
        if meta.ots {
            self.mark_ots();
        }
    }

    /// Flag the paste open team sheet and drop every hidden spread
    pub fn mark_ots(&mut self) {
        self.is_ots = true;
        for set in &mut self.sets {
            if let PasteSet::Creature(creature) = set {
                creature.strip_ots();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_newlines("plain"), "plain");
    }

    #[test]
    fn test_header_split() {
        let input = "{\"title\": \"Rain\", \"ots\": true}\n-----\nPelipper\n- Hurricane";
        let (meta, body) = split_header(input);
        let meta = meta.unwrap();
        assert_eq!(meta.title, "Rain");
        assert!(meta.ots);
        assert_eq!(body, "Pelipper\n- Hurricane");
    }

    #[test]
    fn test_multiline_header() {
        let input = "{\n  \"author\": \"ash\"\n}\n-----\nPikachu";
        let (meta, body) = split_header(input);
        assert_eq!(meta.unwrap().author, "ash");
        assert_eq!(body, "Pikachu");
    }

    #[test]
    fn test_invalid_header_is_body() {
        let input = "{not json}\n-----\nPikachu";
        let (meta, body) = split_header(input);
        assert!(meta.is_none());
        assert_eq!(body, input);

        let input = "[1, 2]\n-----\nPikachu";
        assert!(split_header(input).0.is_none());
    }

    #[test]
    fn test_no_separator() {
        let input = "{\"title\": \"x\"}\nPikachu";
        let (meta, body) = split_header(input);
        assert!(meta.is_none());
        assert_eq!(body, input);

        let (meta, body) = split_header("Pikachu\n-----\n");
        assert!(meta.is_none());
        assert_eq!(body, "Pikachu\n-----\n");
    }

    #[test]
    fn test_apply_metadata() {
        use crate::model::{Creature, StatSpread};

        let mut paste = Paste {
            sets: vec![Creature {
                name: "Pelipper".into(),
                evs: StatSpread([252, 0, 0, 0, 0, 0]),
                nature: "Modest".into(),
                ..Creature::default()
            }
            .into()],
            ..Paste::default()
        };
        let (meta, _) = split_header("{\"title\": \"<b>Rain</b>\", \"ots\": true}\n-----\n");
        paste.apply_metadata(meta.unwrap());

        assert_eq!(paste.title, "&lt;b&gt;Rain&lt;/b&gt;");
        assert!(paste.is_ots);
        let pelipper = paste.sets[0].as_creature().unwrap();
        assert_eq!(pelipper.evs, StatSpread([0; 6]));
        assert!(pelipper.nature.is_empty());
    }
}
