use std::collections::BTreeMap;

use crate::core::Flashcard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub arabic: String,
    pub cards: Vec<Flashcard>,
}

impl DuplicateGroup {
    pub fn contains(&self, id: i64) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    /// Ids that would be deleted if `keep` is chosen.
    pub fn ids_to_remove(&self, keep: i64) -> Vec<i64> {
        self.cards.iter().map(|card| card.id).filter(|id| *id != keep).collect()
    }
}

/// Cards sharing the exact same Arabic text, groups of two or more only.
pub fn find_duplicates(cards: &[Flashcard]) -> Vec<DuplicateGroup> {
    let mut grouped: BTreeMap<&str, Vec<Flashcard>> = BTreeMap::new();

    for card in cards {
        grouped.entry(card.arabic.as_str()).or_default().push(card.clone());
    }

    grouped
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(arabic, mut group)| {
            group.sort_by_key(|card| card.id);
            DuplicateGroup { arabic: arabic.to_string(), cards: group }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64, arabic: &str, spanish: &str) -> Flashcard {
        Flashcard {
            id,
            spanish: spanish.to_string(),
            arabic: arabic.to_string(),
            phonetic: None,
            category: None,
        }
    }

    #[test]
    fn test_groups_only_repeated_words() {
        let cards = vec![
            card(3, "بيت", "casa"),
            card(1, "قلم", "lápiz"),
            card(2, "بيت", "hogar"),
            card(7, "بيت", "casa"),
        ];

        let groups = find_duplicates(&cards);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].arabic, "بيت");
        assert_eq!(groups[0].cards.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 3, 7]);
        assert_eq!(groups[0].ids_to_remove(3), vec![2, 7]);
        assert!(groups[0].contains(7));
        assert!(!groups[0].contains(1));
    }

    #[test]
    fn test_no_duplicates() {
        let cards = vec![card(1, "قلم", "lápiz"), card(2, "كتاب", "libro")];
        assert!(find_duplicates(&cards).is_empty());
    }
}
