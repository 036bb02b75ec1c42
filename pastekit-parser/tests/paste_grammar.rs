//! Integration tests for paste parsing against reference tables

use pastekit_parser::{count_creatures, parse_framed_paste, parse_paste};
use pastekit_spec::{Gender, ImageStyle, Paste, PasteSet, ReferenceTables, Stat, StatSpread};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SPECIES: &str = r#"{
    "gengar": {"id": 94, "type1": "ghost", "type2": "poison", "has_shiny": true, "has_female": false},
    "pelipper": {"id": 279, "type1": "water", "type2": "flying", "has_shiny": true, "has_female": false},
    "ogerpon": {"id": 1017, "type1": "grass", "type2": "", "has_shiny": false, "has_female": false},
    "calyrex-shadow": {"id": 10194, "type1": "psychic", "type2": "ghost", "has_shiny": true, "has_female": false},
    "unfezant": {"id": 521, "type1": "normal", "type2": "flying", "has_shiny": true, "has_female": true},
    "vivillon-poke-ball": {"id": 10186, "type1": "bug", "type2": "flying", "has_shiny": false, "has_female": false}
}"#;

const MOVES: &str = r#"{
    "shadow-ball": {"name": "Shadow Ball", "id": 247, "type1": "ghost"},
    "sludge-bomb": {"name": "Sludge Bomb", "id": 188, "type1": "poison"},
    "hurricane": {"name": "Hurricane", "id": 542, "type1": "flying"},
    "hidden-power": {"name": "Hidden Power", "id": 237, "type1": "normal"}
}"#;

const ITEMS: &str = r#"{
    "Choice Scarf": {"name": "Choice Scarf", "spritenum": 69},
    "Damp Rock": {"name": "Damp Rock", "spritenum": 88}
}"#;

fn tables() -> ReferenceTables {
    ReferenceTables::load_json(SPECIES, MOVES, ITEMS).unwrap()
}

fn parse(text: &str) -> Paste {
    parse_paste(text, ImageStyle::Home, &tables(), &mut ChaCha8Rng::seed_from_u64(1))
}

fn parse_framed(text: &str) -> Paste {
    parse_framed_paste(text, ImageStyle::Home, &tables(), &mut ChaCha8Rng::seed_from_u64(1))
}

fn block_count(text: &str) -> usize {
    text.split("\n\n").filter(|b| !b.trim().is_empty()).count()
}

// ============================================================================
// Head Line and Moves
// ============================================================================

#[test]
fn test_plain_creature_with_item_and_moves() {
    let paste = parse("Gengar @ Choice Scarf\n- Shadow Ball\n- Sludge Bomb");
    assert_eq!(paste.sets.len(), 1);

    let c = paste.sets[0].as_creature().unwrap();
    assert_eq!(c.name, "Gengar");
    assert_eq!(c.nickname, "");
    assert_eq!(c.item, "Choice Scarf");
    assert_eq!(c.type1, "ghost");
    assert_eq!(c.type2, "poison");
    assert_eq!(c.sprite, "home/94.png");
    assert_eq!(
        c.item_image,
        "background: transparent url(\"assets/sprites\") -240px -192px no-repeat"
    );
    let moves: Vec<(&str, &str)> = c
        .moves
        .iter()
        .map(|m| (m.name.as_str(), m.move_type.as_str()))
        .collect();
    assert_eq!(moves, vec![("Shadow Ball", "ghost"), ("Sludge Bomb", "poison")]);
}

#[test]
fn test_nickname_and_gender() {
    let paste = parse("Ghosty (Gengar) (M)\n- Shadow Ball");
    let c = paste.sets[0].as_creature().unwrap();
    assert_eq!(c.nickname, "Ghosty");
    assert_eq!(c.name, "Gengar");
    assert_eq!(c.gender, Gender::Male);
    assert_eq!(c.gender.as_str(), "m");
    assert!(c.item.is_empty());
    assert!(c.item_image.is_empty());
}

#[test]
fn test_female_sprite() {
    let c = parse("Unfezant (F)").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.sprite, "home/female/521.png");
}

#[test]
fn test_unresolved_move_has_empty_type() {
    let c = parse("Gengar\n- Made Up Move").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.moves[0].name, "Made Up Move");
    assert_eq!(c.moves[0].move_type, "");
}

#[test]
fn test_hidden_power_bracket_sets_type() {
    let c = parse("Gengar\n- Hidden Power [Fire] / Sludge Bomb")
        .sets[0]
        .as_creature()
        .unwrap()
        .clone();
    assert_eq!(c.moves.len(), 1);
    assert_eq!(c.moves[0].name, "Hidden Power");
    assert_eq!(c.moves[0].move_type, "fire");
}

// ============================================================================
// Stats
// ============================================================================

#[test]
fn test_ev_line() {
    let c = parse("Gengar\nEVs: 252 SpA / 4 SpD / 252 Spe")
        .sets[0]
        .as_creature()
        .unwrap()
        .clone();
    assert_eq!(c.evs, StatSpread([0, 0, 0, 252, 4, 252]));
    assert_eq!(c.last_stat, Some(Stat::Spe));
    assert!(c.other.is_empty());
}

#[test]
fn test_iv_line_distinguishes_zero_from_unset() {
    let c = parse("Gengar\nIVs: 0 Atk").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.ivs.get(Stat::Atk), Some(0));
    assert_eq!(c.ivs.get(Stat::Hp), None);
    assert_eq!(c.last_stat_iv, Some(Stat::Atk));
}

#[test]
fn test_malformed_stat_lines_go_to_other() {
    let c = parse("Gengar\nEVs: 252 Spe / 4 HP\nIVs: 0 Attack\nEVs: 300 HP")
        .sets[0]
        .as_creature()
        .unwrap()
        .clone();
    assert_eq!(c.evs, StatSpread([0; 6]));
    assert_eq!(c.ivs, StatSpread([None; 6]));
    assert_eq!(
        c.other,
        vec!["EVs: 252 Spe / 4 HP", "IVs: 0 Attack", "EVs: 300 HP"]
    );
    assert_eq!(c.last_stat, None);
}

// ============================================================================
// Fallbacks and Resolution
// ============================================================================

#[test]
fn test_garbled_head_becomes_text() {
    let paste = parse("???garbled???\n- Shadow Ball");
    assert_eq!(paste.sets, vec![PasteSet::Text("???garbled???\n- Shadow Ball".into())]);
}

#[test]
fn test_form_resolves_through_base() {
    let c = parse("Ogerpon-Wellspring").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.name, "Ogerpon-Wellspring");
    assert_eq!(c.type1, "grass");
    assert_eq!(c.sprite, "home/1017-wellspring.png");
}

#[test]
fn test_unresolved_species_is_not_coerced() {
    let c = parse("Missingno @ Choice Scarf").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.name, "Missingno");
    assert!(c.type1.is_empty());
    assert!(c.type2.is_empty());
    assert_eq!(c.sprite, "home/0.png");
}

#[test]
fn test_rider_alias() {
    let c = parse("Calyrex-Shadow-Rider").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.name, "Calyrex-Shadow");
    assert_eq!(c.type2, "ghost");
    assert_eq!(c.sprite, "home/10194.png");
}

#[test]
fn test_sprite_sharing_alias() {
    let c = parse("Vivillon-pokeball").sets[0].as_creature().unwrap().clone();
    assert_eq!(c.name, "Vivillon-Pokeball");
    assert_eq!(c.type1, "bug");
    assert_eq!(c.sprite, "home/10186.png");
}

// ============================================================================
// Keywords, Shiny, Header and OTS
// ============================================================================

#[test]
fn test_keywords_and_shiny() {
    let text = "Gengar @ Choice Scarf\nAbility: Cursed Body\nLevel: 50\nShiny: Yes\nTera Type: Ghost\nTimid Nature\n- Shadow Ball";
    let c = parse(text).sets[0].as_creature().unwrap().clone();
    assert_eq!(c.ability, "Cursed Body");
    assert_eq!(c.level, 50);
    assert_eq!(c.shiny, "Yes");
    assert_eq!(c.tera_type, "Ghost");
    assert_eq!(c.nature, "Timid");
    assert_eq!(c.sprite, "home/shiny/94.png");
    assert_eq!(c.other.len(), 5);
}

#[test]
fn test_framed_header_and_ots() {
    let text = "{\"title\": \"Rain\", \"author\": \"ash\", \"format\": \"VGC\", \"ots\": true}\n-----\nPelipper @ Damp Rock\nModest Nature\nEVs: 252 HP\nIVs: 0 Atk\n- Hurricane";
    let paste = parse_framed(text);
    assert_eq!(paste.title, "Rain");
    assert_eq!(paste.author, "ash");
    assert_eq!(paste.format, "VGC");
    assert!(paste.is_ots);

    let c = paste.sets[0].as_creature().unwrap();
    assert_eq!(c.evs, StatSpread([0; 6]));
    assert_eq!(c.ivs, StatSpread([None; 6]));
    assert_eq!(c.last_stat, None);
    assert_eq!(c.last_stat_iv, None);
    assert!(c.nature.is_empty());
    assert_eq!(c.moves[0].move_type, "flying");
}

#[test]
fn test_plain_parse_keeps_header_lines_as_sets() {
    let text = "{\"title\": \"x\"}\n-----\n\nGengar\n\nPelipper";
    let paste = parse(text);
    assert_eq!(paste.sets.len(), 3);
    assert_eq!(paste.title, "");
    assert_eq!(
        paste.sets[0],
        PasteSet::Text("{&quot;title&quot;: &quot;x&quot;}\n-----".into())
    );
    assert_eq!(count_creatures(text), 2);
}

#[test]
fn test_framed_without_header_matches_plain() {
    let text = "Gengar\n- Shadow Ball\n\nPelipper";
    assert_eq!(parse_framed(text), parse(text));
}

#[test]
fn test_crlf_input() {
    let paste = parse("Gengar\r\n- Shadow Ball\r\n\r\nPelipper\r\n- Hurricane");
    assert_eq!(paste.sets.len(), 2);
    assert_eq!(paste.sets[1].as_creature().unwrap().moves[0].name, "Hurricane");
}

#[test]
fn test_sanitized_output() {
    let paste = parse_framed("{\"title\": \"<b>Rain</b>\"}\n-----\n<script>alert(1)</script>\n\nGengar\nNote: a & b");
    assert_eq!(paste.title, "&lt;b&gt;Rain&lt;/b&gt;");
    assert_eq!(paste.sets[0].as_text(), Some("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert_eq!(paste.sets[1].as_creature().unwrap().other, vec!["Note: a &amp; b"]);
}

#[test]
fn test_count_creatures_ignores_text_blocks() {
    assert_eq!(count_creatures("Gengar\n\n???\n\nPelipper"), 2);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_parse_is_total_and_preserves_block_count(text in "[A-Za-z0-9 @()/:\\-\\[\\]\n]{0,200}") {
        let paste = parse(&text);
        prop_assert_eq!(paste.sets.len(), block_count(&text));
    }

    #[test]
    fn prop_block_count_holds_for_header_like_text(
        text in "(\\{\"title\": \"[a-z]{0,5}\"\\}\n-----\n)?[A-Za-z {}\":\\-\n]{0,120}"
    ) {
        let paste = parse(&text);
        prop_assert_eq!(paste.sets.len(), block_count(&text));
        prop_assert!(paste.title.is_empty());
    }

    #[test]
    fn prop_parse_never_panics_on_arbitrary_text(text in any::<String>()) {
        let _ = parse(&text);
    }
}
