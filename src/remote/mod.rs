pub mod auth_events;
#[cfg(test)]
pub mod memory;
pub mod supabase;

use async_trait::async_trait;

pub use auth_events::{
    AuthChange,
    AuthEvent,
    AuthEvents,
    AuthListener,
    Subscription,
};
pub use supabase::SupabaseClient;

use crate::core::{
    AuthSession,
    Category,
    CategoryDraft,
    Flashcard,
    FlashcardDraft,
    Identity,
    TarjetasError,
};

/// Hosted row storage plus authentication, as seen by the app.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    /// Rows of `categories` flagged `is_category`.
    async fn fetch_categories(&self) -> Result<Vec<Category>, TarjetasError>;

    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category, TarjetasError>;

    async fn update_category(
        &self,
        id: i64,
        draft: &CategoryDraft,
    ) -> Result<Category, TarjetasError>;

    async fn delete_category(&self, id: i64) -> Result<(), TarjetasError>;

    /// Cards whose `category` column matches the given title.
    async fn fetch_flashcards(&self, category: &str) -> Result<Vec<Flashcard>, TarjetasError>;

    async fn fetch_all_flashcards(&self) -> Result<Vec<Flashcard>, TarjetasError>;

    async fn insert_flashcard(&self, draft: &FlashcardDraft) -> Result<Flashcard, TarjetasError>;

    async fn update_flashcard(
        &self,
        id: i64,
        draft: &FlashcardDraft,
    ) -> Result<Flashcard, TarjetasError>;

    async fn delete_flashcard(&self, id: i64) -> Result<(), TarjetasError>;

    async fn current_user(&self) -> Result<Option<Identity>, TarjetasError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, TarjetasError>;

    async fn sign_out(&self) -> Result<(), TarjetasError>;

    /// The listener receives the current session immediately, then every change.
    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription;
}
