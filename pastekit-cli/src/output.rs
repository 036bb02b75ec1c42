//! Human-readable paste summary

use std::fmt::Write;

use pastekit_spec::{Creature, Paste, PasteSet, Stat};

fn spread_line(creature: &Creature) -> Option<String> {
    let evs: Vec<String> = creature
        .evs
        .iter()
        .filter(|&(_, v)| v != 0)
        .map(|(stat, v)| format!("{v} {}", stat.abbrev()))
        .collect();
    (!evs.is_empty()).then(|| evs.join(" / "))
}

fn creature_line(out: &mut String, creature: &Creature) {
    let types = [creature.type1.as_str(), creature.type2.as_str()]
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let _ = write!(out, "{}", creature.name);
    if !creature.nickname.is_empty() {
        let _ = write!(out, " \"{}\"", creature.nickname);
    }
    if types.is_empty() {
        out.push_str(" [unresolved]");
    } else {
        let _ = write!(out, " [{types}]");
    }
    if !creature.item.is_empty() {
        let _ = write!(out, " @ {}", creature.item);
    }
    let _ = writeln!(out, " Lv{}", creature.level);

    let moves: Vec<&str> = creature.moves.iter().map(|m| m.name.as_str()).collect();
    if !moves.is_empty() {
        let _ = writeln!(out, "    moves: {}", moves.join(", "));
    }
    if let Some(evs) = spread_line(creature) {
        let _ = writeln!(out, "    evs: {evs}");
    }
    let ivs: Vec<String> = Stat::ALL
        .iter()
        .filter_map(|&stat| creature.ivs.get(stat).map(|v| format!("{v} {}", stat.abbrev())))
        .collect();
    if !ivs.is_empty() {
        let _ = writeln!(out, "    ivs: {}", ivs.join(" / "));
    }
    let _ = writeln!(out, "    sprite: {}", creature.sprite);
}

pub fn summary(paste: &Paste) -> String {
    let mut out = String::new();
    if !paste.title.is_empty() {
        let _ = writeln!(out, "{}", paste.title);
    }
    if !paste.author.is_empty() {
        let _ = writeln!(out, "by {}", paste.author);
    }
    if paste.is_ots {
        out.push_str("(open team sheet)\n");
    }

    for (i, set) in paste.sets.iter().enumerate() {
        let _ = write!(out, "{:>2}. ", i + 1);
        match set {
            PasteSet::Creature(creature) => creature_line(&mut out, creature),
            PasteSet::Text(text) => {
                let _ = writeln!(out, "(text, {} lines)", text.lines().count());
            }
        }
    }
    let _ = writeln!(out, "{} creature(s), {} set(s)", paste.creature_count(), paste.sets.len());
    out
}
