use std::cmp::Ordering;

use icu_collator::{
    Collator,
    CollatorOptions,
};
use icu_locid::locale;

use crate::core::Category;

const CLUE_PREFIX: &str = "pista";

fn folded_title(category: &Category) -> String {
    category.display_title().to_lowercase()
}

/// Clue categories ("Pista 1", "PISTA final", ...) are listed before everything else.
pub fn is_clue(category: &Category) -> bool {
    folded_title(category).starts_with(CLUE_PREFIX)
}

struct TitleCollation {
    collator: Option<Collator>,
}

impl TitleCollation {
    fn spanish() -> Self {
        match Collator::try_new(&locale!("es").into(), CollatorOptions::new()) {
            Ok(collator) => Self { collator: Some(collator) },
            Err(e) => {
                log::warn!("Spanish collation unavailable, falling back to code point order: {e:?}");
                Self { collator: None }
            }
        }
    }

    fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(left, right),
            None => left.cmp(right),
        }
    }
}

struct SortKey<'a> {
    category: &'a Category,
    clue: bool,
    folded: String,
}

fn compare_keys(left: &SortKey<'_>, right: &SortKey<'_>, collation: &TitleCollation) -> Ordering {
    match (left.clue, right.clue) {
        (true, true) => left.category.id.cmp(&right.category.id),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => collation
            .compare(&left.folded, &right.folded)
            .then_with(|| left.category.id.cmp(&right.category.id)),
    }
}

/// Orders categories for the menu: clues by id first, then the rest alphabetically
/// under Spanish collation. The input is left untouched.
pub fn sort_categories(categories: &[Category]) -> Vec<Category> {
    let collation = TitleCollation::spanish();

    let mut keys: Vec<SortKey<'_>> = categories
        .iter()
        .map(|category| SortKey { category, clue: is_clue(category), folded: folded_title(category) })
        .collect();

    keys.sort_by(|a, b| compare_keys(a, b, &collation));

    keys.into_iter().map(|key| key.category.clone()).collect()
}
