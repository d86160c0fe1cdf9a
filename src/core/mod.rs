pub mod arabic;
pub mod category_order;
pub mod duplicates;
pub mod errors;
pub mod models;
pub mod tasks;

pub use errors::TarjetasError;
pub use models::{
    AuthSession,
    Category,
    CategoryDraft,
    Flashcard,
    FlashcardDraft,
    Identity,
    Session,
};
