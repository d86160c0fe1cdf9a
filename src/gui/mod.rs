pub mod admin_panel;
pub mod app;
pub mod card_editor;
pub mod category_menu;
pub mod crash_guard;
pub mod error_modal;
pub mod flashcard_list;
pub mod login_modal;
pub mod modal;
pub mod study_view;
pub mod theme;
pub mod top_bar;

pub use app::TarjetasApp;
