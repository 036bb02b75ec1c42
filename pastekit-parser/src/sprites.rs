//! # Sprite Descriptors
//!
//! Species sprites are relative asset paths; item icons are CSS background
//! declarations into a 16-column sheet of 48px cells.

use pastekit_spec::{ImageStyle, ItemDescriptor, ReferenceTable, SpeciesDescriptor};
use rand::seq::SliceRandom;
use rand::Rng;

/// File name used when a species cannot be addressed
pub const FALLBACK_SPRITE: &str = "0.png";

/// Icon declaration for items without a sheet index
pub const UNKNOWN_ITEM_IMAGE: &str = "background: transparent url(\"https://play.pokemonshowdown.com/sprites/pokemonicons-sheet.png?v16\") -360px -2580px no-repeat";

/// Item sheet URL
pub const ITEM_SHEET: &str = "assets/sprites";

const ITEM_SHEET_COLUMNS: u32 = 16;
const ITEM_CELL_PX: u32 = 48;

const ALCREMIE_ID: u32 = 869;
const ALCREMIE_DEFAULT_FLAVOR: &str = "vanilla-cream";
const ALCREMIE_DECORATIONS: [&str; 7] = [
    "berry-sweet",
    "clove-sweet",
    "flower-sweet",
    "love-sweet",
    "ribbon-sweet",
    "star-sweet",
    "strawberry-sweet",
];

/// Sprite path for a resolved species key
///
/// `key` is the key returned by the resolver, so it may carry a form suffix
/// that is not itself a table key (`floette-white`); such forms address
/// `<base id>-<suffix>` under the same shiny and female directories as the
/// base. Shiny and female variants are only used when the descriptor says
/// the asset exists.
pub fn species_sprite<R: Rng + ?Sized>(
    species: &ReferenceTable<SpeciesDescriptor>,
    key: &str,
    shiny: bool,
    female: bool,
    style: ImageStyle,
    rng: &mut R,
) -> String {
    let root = style.root();

    if style == ImageStyle::Home && key.starts_with("alcremie") && !key.contains("gmax") {
        return alcremie_sprite(key, shiny, rng);
    }

    if let Some(descriptor) = species.get(key) {
        return match style {
            ImageStyle::Home => format!(
                "{}/{}{}{}.png",
                root,
                variant_dir(shiny && descriptor.has_shiny, "shiny/"),
                variant_dir(female && descriptor.has_female, "female/"),
                descriptor.id
            ),
            ImageStyle::Flat => format!(
                "{}/{}{}.png",
                root,
                variant_dir(shiny && descriptor.has_shiny, "shiny/"),
                key
            ),
        };
    }

    if let Some((base, form)) = key.split_once('-') {
        if let Some(descriptor) = species.get(base) {
            let shiny_dir = variant_dir(shiny && descriptor.has_shiny, "shiny/");
            return match style {
                ImageStyle::Home => format!(
                    "{}/{}{}{}-{}.png",
                    root,
                    shiny_dir,
                    variant_dir(female && descriptor.has_female, "female/"),
                    descriptor.id,
                    form
                ),
                ImageStyle::Flat => format!("{}/{}{}.png", root, shiny_dir, key),
            };
        }
    }

    fallback_sprite(style)
}

/// Sprite used for unresolved species
pub fn fallback_sprite(style: ImageStyle) -> String {
    format!("{}/{}", style.root(), FALLBACK_SPRITE)
}

fn variant_dir(enabled: bool, dir: &'static str) -> &'static str {
    if enabled {
        dir
    } else {
        ""
    }
}

/// Alcremie has too many flavour/decoration pairs to ship; pick a decoration
fn alcremie_sprite<R: Rng + ?Sized>(key: &str, shiny: bool, rng: &mut R) -> String {
    let decoration = ALCREMIE_DECORATIONS
        .choose(rng)
        .copied()
        .unwrap_or(ALCREMIE_DECORATIONS[0]);

    if shiny {
        return format!("home/shiny/{}-{}.png", ALCREMIE_ID, decoration);
    }

    let flavor = match key.split_once('-') {
        Some((_, flavor)) if !flavor.is_empty() => flavor,
        _ => ALCREMIE_DEFAULT_FLAVOR,
    };
    format!("home/{}-{}-{}.png", ALCREMIE_ID, flavor, decoration)
}

/// CSS background declaration for an item, looked up by display name
pub fn item_image(items: &ReferenceTable<ItemDescriptor>, item: &str) -> String {
    match items.get(item).and_then(|d| d.spritenum) {
        Some(n) => {
            let left = (n % ITEM_SHEET_COLUMNS) * ITEM_CELL_PX;
            let top = (n / ITEM_SHEET_COLUMNS) * ITEM_CELL_PX;
            format!(
                "background: transparent url(\"{}\") -{}px -{}px no-repeat",
                ITEM_SHEET, left, top
            )
        }
        None => UNKNOWN_ITEM_IMAGE.to_string(),
    }
}
