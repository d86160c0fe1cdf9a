use eframe::egui;

use crate::{
    controller::DeckState,
    core::{
        Category,
        TarjetasError,
    },
    gui::{
        flashcard_list::{
            flashcard_list,
            CardAction,
            CardOptions,
        },
        theme::Theme,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyAction {
    Card(CardAction),
    NewCard,
}

pub fn study_view(
    ui: &mut egui::Ui,
    theme: &Theme,
    selected: Option<&Category>,
    deck: &DeckState,
    options: &CardOptions,
) -> Result<Option<StudyAction>, TarjetasError> {
    let Some(category) = selected else {
        placeholder(ui, theme);
        return Ok(None);
    };

    if deck.category() != Some(category.display_title()) {
        return Err(TarjetasError::Render(format!(
            "the cards shown do not belong to category {}",
            category.id
        )));
    }

    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(theme.heading(ui.ctx(), category.display_title()));
        if options.is_admin {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("➕ Nueva tarjeta").clicked() {
                    action = Some(StudyAction::NewCard);
                }
            });
        }
    });
    ui.add_space(10.0);

    if let Some(error) = deck.error() {
        ui.colored_label(theme.red(ui.ctx()), format!("No se pudieron cargar las tarjetas: {error}"));
        return Ok(action);
    }

    if deck.is_loading() && deck.cards().is_empty() {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new());
            ui.label("Cargando tarjetas...");
        });
        return Ok(action);
    }

    if deck.cards().is_empty() {
        ui.label(egui::RichText::new("No hay tarjetas en esta pista").color(theme.comment(ui.ctx())));
        return Ok(action);
    }

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        if let Some(card_action) = flashcard_list(ui, theme, deck, options) {
            action = Some(StudyAction::Card(card_action));
        }
    });

    Ok(action)
}

fn placeholder(ui: &mut egui::Ui, theme: &Theme) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.label(egui::RichText::new("📖").size(40.0).color(theme.accent(ui.ctx())));
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("Selecciona una pista del menú para comenzar")
                .size(18.0)
                .color(theme.comment(ui.ctx())),
        );
    });
}
