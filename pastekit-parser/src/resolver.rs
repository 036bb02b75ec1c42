//! # Name Resolver
//!
//! Fuzzy lookup of a free-text name against a reference table:
//!
//! 1. exact key match
//! 2. case-insensitive anchored prefix match, where `_` matches any single
//!    character and `%` any run; the first key in table order wins
//! 3. strip everything from the first `-` and retry; a hit there returns the
//!    original candidate as the key, so form suffixes survive
//!
//! An empty candidate never matches.

use pastekit_spec::ReferenceTable;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Compiled patterns are capped so a hostile candidate cannot blow up memory
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Resolve `candidate` against `table`, returning the key to use downstream
/// and the matched descriptor
pub fn search_like<'t, D>(table: &'t ReferenceTable<D>, candidate: &str) -> Option<(String, &'t D)> {
    if candidate.is_empty() {
        return None;
    }

    if let Some(descriptor) = table.get(candidate) {
        return Some((candidate.to_string(), descriptor));
    }

    if let Some(pattern) = prefix_pattern(candidate) {
        if let Some((key, descriptor)) = table.iter().find(|(key, _)| pattern.is_match(key)) {
            return Some((key.to_string(), descriptor));
        }
    }

    let (base, _) = candidate.split_once('-')?;
    let (_, descriptor) = search_like(table, base)?;
    debug!(candidate, base, "resolved through base name");
    Some((candidate.to_string(), descriptor))
}

/// Build `(?i)^<candidate>` with the two wildcards translated and every other
/// character matched literally
fn prefix_pattern(candidate: &str) -> Option<Regex> {
    let mut pattern = String::with_capacity(candidate.len() + 8);
    pattern.push('^');
    let mut buf = [0u8; 4];
    for ch in candidate.chars() {
        match ch {
            '%' => pattern.push_str(".*"),
            '_' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }

    match RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(candidate, %err, "prefix pattern rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(keys: &[&str]) -> ReferenceTable<u32> {
        keys.iter().enumerate().map(|(i, k)| (*k, i as u32)).collect()
    }

    #[test]
    fn test_exact_match() {
        let t = table(&["gengar", "gengar-mega"]);
        assert_eq!(search_like(&t, "gengar"), Some(("gengar".to_string(), &0)));
    }

    #[test]
    fn test_prefix_match_uses_table_order() {
        let t = table(&["urshifu-single-strike", "urshifu-rapid-strike", "urshifu"]);
        assert_eq!(
            search_like(&t, "urshifu-"),
            Some(("urshifu-single-strike".to_string(), &0))
        );
        assert_eq!(
            search_like(&t, "URSHIFU-R"),
            Some(("urshifu-rapid-strike".to_string(), &1))
        );
    }

    #[test]
    fn test_base_fallback_keeps_candidate() {
        let t = table(&["ogerpon"]);
        assert_eq!(
            search_like(&t, "ogerpon-wellspring"),
            Some(("ogerpon-wellspring".to_string(), &0))
        );
    }

    #[test]
    fn test_wildcards() {
        let t = table(&["mr-mime", "porygon-z"]);
        assert_eq!(search_like(&t, "mr_mime"), Some(("mr-mime".to_string(), &0)));
        assert_eq!(search_like(&t, "pory%z"), Some(("porygon-z".to_string(), &1)));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let t = table(&["typexnull", "farfetchd"]);
        assert_eq!(search_like(&t, "type.null"), None);
        assert_eq!(search_like(&t, ".*"), None);
        assert_eq!(search_like(&t, "farfetch(d)"), None);
    }

    #[test]
    fn test_not_found() {
        let t = table(&["gengar"]);
        assert_eq!(search_like(&t, "missingno"), None);
        assert_eq!(search_like(&t, "missing-no"), None);
        assert_eq!(search_like(&t, ""), None);
        assert_eq!(search_like(&t, "-gengar"), None);
    }
}
