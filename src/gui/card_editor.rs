use eframe::egui;

use crate::{
    controller::AdminAction,
    core::{
        Flashcard,
        FlashcardDraft,
    },
    gui::modal::{
        Modal,
        ModalConfig,
        ModalResult,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardEditorData {
    pub id: Option<i64>,
    pub spanish: String,
    pub arabic: String,
    pub phonetic: String,
    pub category: String,
    pub error: Option<String>,
}

impl CardEditorData {
    pub fn for_card(card: &Flashcard) -> Self {
        Self {
            id: Some(card.id),
            spanish: card.spanish.clone(),
            arabic: card.arabic.clone(),
            phonetic: card.phonetic.clone().unwrap_or_default(),
            category: card.category.clone().unwrap_or_default(),
            error: None,
        }
    }

    pub fn for_category(category: Option<&str>) -> Self {
        Self { category: category.unwrap_or_default().to_string(), ..Self::default() }
    }

    /// Trimmed draft; blank optional fields are stored as null.
    pub fn to_draft(&self) -> Result<FlashcardDraft, String> {
        let spanish = self.spanish.trim();
        let arabic = self.arabic.trim();
        if spanish.is_empty() || arabic.is_empty() {
            return Err("El español y el árabe son obligatorios".to_string());
        }

        let optional = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        Ok(FlashcardDraft {
            spanish: spanish.to_string(),
            arabic: arabic.to_string(),
            phonetic: optional(&self.phonetic),
            category: optional(&self.category),
        })
    }
}

pub struct CardEditor {
    modal: Modal<CardEditorData>,
}

impl CardEditor {
    pub fn new() -> Self {
        let config = ModalConfig {
            resizable: true,
            min_size: Some(egui::Vec2::new(380.0, 220.0)),
            close_on_outside_click: false,
            ..ModalConfig::default()
        };
        Self { modal: Modal::new("Tarjeta").with_config(config) }
    }

    pub fn open_new(&mut self, category: Option<&str>) {
        self.modal.open_with("Nueva tarjeta", CardEditorData::for_category(category));
    }

    pub fn open_edit(&mut self, card: &Flashcard) {
        self.modal.open_with(format!("Editar tarjeta {}", card.id), CardEditorData::for_card(card));
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<AdminAction> {
        let result = self.modal.show(ctx, |ui, data| {
            egui::Grid::new("card_editor_fields").num_columns(2).spacing([8.0, 8.0]).show(ui, |ui| {
                ui.label("Árabe");
                ui.add(egui::TextEdit::singleline(&mut data.arabic).desired_width(260.0));
                ui.end_row();

                ui.label("Español");
                ui.add(egui::TextEdit::singleline(&mut data.spanish).desired_width(260.0));
                ui.end_row();

                ui.label("Fonética");
                ui.add(egui::TextEdit::singleline(&mut data.phonetic).desired_width(260.0));
                ui.end_row();

                ui.label("Categoría");
                ui.add(egui::TextEdit::singleline(&mut data.category).desired_width(260.0));
                ui.end_row();
            });

            if let Some(error) = &data.error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            ui.add_space(10.0);
            let clicked = ui
                .horizontal(|ui| {
                    if ui.button("Guardar").clicked() {
                        Some(true)
                    } else if ui.button("Cancelar").clicked() {
                        Some(false)
                    } else {
                        None
                    }
                })
                .inner;

            match clicked {
                Some(true) => match data.to_draft() {
                    Ok(_) => Some(ModalResult::Confirmed(data.clone())),
                    Err(e) => {
                        data.error = Some(e);
                        None
                    }
                },
                Some(false) => Some(ModalResult::Cancelled),
                None => None,
            }
        });

        match result {
            Some(ModalResult::Confirmed(data)) => {
                let draft = data.to_draft().ok()?;
                Some(AdminAction::SaveCard { id: data.id, draft })
            }
            _ => None,
        }
    }
}

impl Default for CardEditor {
    fn default() -> Self {
        Self::new()
    }
}
