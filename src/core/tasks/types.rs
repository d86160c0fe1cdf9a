use std::fmt;

use crate::{
    core::{
        duplicates::DuplicateGroup,
        Category,
        Flashcard,
        Identity,
    },
    remote::AuthEvent,
};

/// What an admin write changed, used for the confirmation notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    CategoryCreated(Category),
    CategoryUpdated(Category),
    CategoryDeleted(i64),
    CardCreated(Flashcard),
    CardUpdated(Flashcard),
    CardDeleted(i64),
    NunationCleaned { updated: usize },
    DuplicatesResolved { kept: i64, removed: usize },
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::CategoryCreated(c) => {
                write!(f, "Categoría creada: {} (ID {})", c.display_title(), c.id)
            }
            MutationOutcome::CategoryUpdated(c) => {
                write!(f, "Categoría guardada: {} (ID {})", c.display_title(), c.id)
            }
            MutationOutcome::CategoryDeleted(id) => write!(f, "Categoría {id} borrada"),
            MutationOutcome::CardCreated(card) => write!(f, "Tarjeta creada (ID {})", card.id),
            MutationOutcome::CardUpdated(card) => write!(f, "Tarjeta guardada (ID {})", card.id),
            MutationOutcome::CardDeleted(id) => write!(f, "Tarjeta {id} borrada"),
            MutationOutcome::NunationCleaned { updated } => {
                write!(f, "Limpieza de nunaciones: {updated} tarjeta(s) corregida(s)")
            }
            MutationOutcome::DuplicatesResolved { kept, removed } => {
                write!(f, "Conservada la tarjeta {kept}, {removed} duplicada(s) borrada(s)")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Already sorted for display; empty when the fetch failed.
    CategoriesLoaded(Vec<Category>),
    CurrentUser(Option<Identity>),
    AuthStateChanged(AuthEvent),
    SignIn(Result<(), String>),
    SignOut(Result<(), String>),

    FlashcardsLoaded { category: String, result: Result<Vec<Flashcard>, String> },
    DuplicatesFound(Result<Vec<DuplicateGroup>, String>),
    Mutation(Result<MutationOutcome, String>),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::CategoriesLoaded(_) => "categories",
            TaskResult::CurrentUser(_) => "current_user",
            TaskResult::AuthStateChanged(_) => "auth_state_changed",
            TaskResult::SignIn(_) => "sign_in",
            TaskResult::SignOut(_) => "sign_out",
            TaskResult::FlashcardsLoaded { .. } => "flashcards",
            TaskResult::DuplicatesFound(_) => "duplicates",
            TaskResult::Mutation(_) => "mutation",
        }
    }
}
