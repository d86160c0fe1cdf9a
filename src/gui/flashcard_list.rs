use std::borrow::Cow;

use eframe::egui;

use crate::{
    config::FrontLanguage,
    controller::DeckState,
    core::{
        arabic::strip_diacritics,
        Flashcard,
    },
    gui::theme::Theme,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    Flip(i64),
    Edit(Flashcard),
    Delete(Flashcard),
}

pub struct CardOptions {
    pub front: FrontLanguage,
    pub show_diacritics: bool,
    pub is_admin: bool,
}

impl CardOptions {
    fn arabic<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.show_diacritics {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(strip_diacritics(text))
        }
    }

    fn faces<'a>(&self, card: &'a Flashcard) -> (Cow<'a, str>, Cow<'a, str>) {
        match self.front {
            FrontLanguage::Spanish => (Cow::Borrowed(card.spanish.as_str()), self.arabic(&card.arabic)),
            FrontLanguage::Arabic => (self.arabic(&card.arabic), Cow::Borrowed(card.spanish.as_str())),
        }
    }
}

pub fn flashcard_list(
    ui: &mut egui::Ui,
    theme: &Theme,
    deck: &DeckState,
    options: &CardOptions,
) -> Option<CardAction> {
    let mut action = None;

    for card in deck.cards() {
        if let Some(card_action) = flashcard(ui, theme, card, deck.is_revealed(card.id), options) {
            action = Some(card_action);
        }
        ui.add_space(8.0);
    }

    action
}

fn flashcard(
    ui: &mut egui::Ui,
    theme: &Theme,
    card: &Flashcard,
    revealed: bool,
    options: &CardOptions,
) -> Option<CardAction> {
    let mut action = None;
    let (front, back) = options.faces(card);

    egui::Frame::new()
        .fill(theme.card_fill(ui.ctx()))
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(14))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.label(
                egui::RichText::new(card.category_label()).small().color(theme.comment(ui.ctx())),
            );
            let mut flip = ui
                .add(
                    egui::Label::new(egui::RichText::new(front.as_ref()).size(20.0).strong())
                        .sense(egui::Sense::click()),
                )
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .clicked();

            if let Some(phonetic) = card.phonetic_line() {
                ui.label(egui::RichText::new(phonetic).italics().color(theme.comment(ui.ctx())));
            }

            if revealed {
                ui.separator();
                let back = egui::RichText::new(back.as_ref()).size(18.0).color(theme.accent(ui.ctx()));
                flip |= ui.add(egui::Label::new(back).sense(egui::Sense::click())).clicked();
            } else {
                flip |= ui.small_button("Ver traducción").clicked();
            }

            if flip {
                action = Some(CardAction::Flip(card.id));
            }

            if options.is_admin {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let edit = egui::Button::new(egui::RichText::new("Editar").color(egui::Color32::WHITE))
                        .fill(theme.blue(ui.ctx()));
                    if ui.add(edit).clicked() {
                        action = Some(CardAction::Edit(card.clone()));
                    }

                    let delete = egui::Button::new(egui::RichText::new("Borrar").color(egui::Color32::WHITE))
                        .fill(theme.red(ui.ctx()));
                    if ui.add(delete).clicked() {
                        action = Some(CardAction::Delete(card.clone()));
                    }
                });
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Flashcard {
        Flashcard {
            id: 1,
            spanish: "libro".into(),
            arabic: "كِتَابٌ".into(),
            phonetic: None,
            category: None,
        }
    }

    #[test]
    fn test_front_language_chooses_faces() {
        let card = card();
        let spanish_front =
            CardOptions { front: FrontLanguage::Spanish, show_diacritics: true, is_admin: false };
        let (front, back) = spanish_front.faces(&card);
        assert_eq!(front, "libro");
        assert_eq!(back, "كِتَابٌ");

        let arabic_front = CardOptions { front: FrontLanguage::Arabic, ..spanish_front };
        let (front, back) = arabic_front.faces(&card);
        assert_eq!(front, "كِتَابٌ");
        assert_eq!(back, "libro");
    }

    #[test]
    fn test_hidden_diacritics_only_touch_arabic() {
        let card = card();
        let options = CardOptions { front: FrontLanguage::Arabic, show_diacritics: false, is_admin: false };
        let (front, back) = options.faces(&card);
        assert_eq!(front, "كتاب");
        assert_eq!(back, "libro");
    }
}
