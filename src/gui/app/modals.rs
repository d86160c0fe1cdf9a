use crate::{
    controller::AdminAction,
    gui::{
        card_editor::CardEditor,
        error_modal::ErrorModal,
        modal::Modal,
    },
};

pub struct Modals {
    pub error: ErrorModal,
    pub card_editor: CardEditor,
    pub confirm: Modal<Option<AdminAction>>,
    pub confirm_message: String,
}

impl Modals {
    pub fn ask(&mut self, message: String, action: AdminAction) {
        self.confirm_message = message;
        self.confirm.open_with("Confirmar", Some(action));
    }
}

impl Default for Modals {
    fn default() -> Self {
        Self {
            error: ErrorModal::new(),
            card_editor: CardEditor::new(),
            confirm: Modal::new("Confirmar"),
            confirm_message: String::new(),
        }
    }
}
