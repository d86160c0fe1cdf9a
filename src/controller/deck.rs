use std::collections::HashSet;

use crate::core::{
    tasks::TaskManager,
    Flashcard,
};

/// Cards of the selected category.
#[derive(Debug, Default)]
pub struct DeckState {
    category: Option<String>,
    cards: Vec<Flashcard>,
    loading: bool,
    error: Option<String>,
    revealed: HashSet<i64>,
}

impl DeckState {
    pub fn load(&mut self, tasks: &TaskManager, category: &str) {
        self.category = Some(category.to_string());
        self.cards.clear();
        self.revealed.clear();
        self.error = None;
        self.loading = true;
        tasks.load_flashcards(category.to_string());
    }

    /// Fetches the current category again, keeping the visible cards until the answer arrives.
    pub fn reload(&mut self, tasks: &TaskManager) {
        if let Some(category) = &self.category {
            self.loading = true;
            tasks.load_flashcards(category.clone());
        }
    }

    /// Returns false when the result belongs to a category that is no longer shown.
    pub fn apply(&mut self, category: &str, result: Result<Vec<Flashcard>, String>) -> bool {
        if self.category.as_deref() != Some(category) {
            log::debug!("Ignoring stale cards for {category}");
            return false;
        }

        self.loading = false;
        match result {
            Ok(cards) => {
                self.revealed.retain(|id| cards.iter().any(|card| card.id == *id));
                self.cards = cards;
                self.error = None;
            }
            Err(e) => {
                self.cards.clear();
                self.error = Some(e);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn toggle_revealed(&mut self, id: i64) {
        if !self.revealed.remove(&id) {
            self.revealed.insert(id);
        }
    }

    pub fn is_revealed(&self, id: i64) -> bool {
        self.revealed.contains(&id)
    }
}
