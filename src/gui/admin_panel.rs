use std::collections::HashMap;

use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use crate::{
    controller::{
        AdminAction,
        AdminState,
    },
    core::{
        duplicates::DuplicateGroup,
        Category,
        CategoryDraft,
        Flashcard,
        TarjetasError,
    },
    gui::theme::Theme,
};

/// Text for the confirmation asked before destructive actions.
pub fn confirmation_message(action: &AdminAction) -> Option<String> {
    match action {
        AdminAction::DeleteCategory(id) => Some(format!("¿Borrar la categoría {id}?")),
        AdminAction::DeleteCard(id) => Some(format!("¿Borrar la tarjeta {id}?")),
        AdminAction::CleanNunation => {
            Some("¿Quitar las nunaciones finales de todas las tarjetas?".to_string())
        }
        AdminAction::KeepDuplicate { keep, group } => Some(format!(
            "¿Conservar la tarjeta {keep} y borrar {} duplicada(s)?",
            group.ids_to_remove(*keep).len()
        )),
        _ => None,
    }
}

/// What the admin screen asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    Admin(AdminAction),
    /// Open the card editor, e.g. to fix one version of a duplicate.
    EditCard(Flashcard),
}

impl From<AdminAction> for PanelAction {
    fn from(action: AdminAction) -> Self {
        PanelAction::Admin(action)
    }
}

#[derive(Default)]
pub struct AdminPanel {
    new_title: String,
    editing: Option<(i64, String)>,
    keep: HashMap<String, i64>,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        categories: &[Category],
        admin: &AdminState,
    ) -> Result<Option<PanelAction>, TarjetasError> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading(theme.heading(ui.ctx(), "Administración"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🔄 Recargar").clicked() {
                    action = Some(PanelAction::Admin(AdminAction::Refresh));
                }
                if admin.is_busy() {
                    ui.add(egui::Spinner::new());
                }
            });
        });
        ui.add_space(8.0);

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            egui::CollapsingHeader::new("Categorías").default_open(true).show(ui, |ui| {
                if let Some(a) = self.categories_section(ui, theme, categories) {
                    action = Some(a.into());
                }
            });

            ui.add_space(8.0);

            egui::CollapsingHeader::new("Mantenimiento").default_open(true).show(ui, |ui| {
                if let Some(a) = self.maintenance_section(ui, theme, admin) {
                    action = Some(a);
                }
            });
        });

        Ok(action)
    }

    fn categories_section(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        categories: &[Category],
    ) -> Option<AdminAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.new_title).hint_text("Nueva categoría"));
            let title = self.new_title.trim().to_string();
            if ui.add_enabled(!title.is_empty(), egui::Button::new("Crear")).clicked() {
                action = Some(AdminAction::SaveCategory {
                    id: None,
                    draft: CategoryDraft { title, is_category: true },
                });
                self.new_title.clear();
            }
        });
        ui.add_space(6.0);

        let row_height = egui::TextStyle::Body.resolve(ui.style()).size.max(ui.spacing().interact_size.y);

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(50.0))
            .column(Column::remainder().at_least(160.0))
            .column(Column::auto().at_least(150.0))
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.strong("ID");
                });
                header.col(|ui| {
                    ui.strong("Título");
                });
                header.col(|_ui| {});
            })
            .body(|mut body| {
                body.rows(row_height, categories.len(), |mut row| {
                    let category = &categories[row.index()];
                    let editing = matches!(&self.editing, Some((id, _)) if *id == category.id);

                    row.col(|ui| {
                        ui.label(egui::RichText::new(category.id.to_string()).color(theme.accent(ui.ctx())));
                    });
                    row.col(|ui| match &mut self.editing {
                        Some((_, title)) if editing => {
                            ui.add(egui::TextEdit::singleline(title).desired_width(f32::INFINITY));
                        }
                        _ => {
                            ui.label(category.display_title());
                        }
                    });
                    row.col(|ui| {
                        if editing {
                            if ui.button("Guardar").clicked() {
                                if let Some((id, title)) = self.editing.take() {
                                    action = Some(AdminAction::SaveCategory {
                                        id: Some(id),
                                        draft: CategoryDraft {
                                            title: title.trim().to_string(),
                                            ..CategoryDraft::from(category)
                                        },
                                    });
                                }
                            }
                            if ui.button("Cancelar").clicked() {
                                self.editing = None;
                            }
                        } else {
                            if ui.button("Editar").clicked() {
                                self.editing =
                                    Some((category.id, category.display_title().to_string()));
                            }
                            if ui.button("Borrar").clicked() {
                                action = Some(AdminAction::DeleteCategory(category.id));
                            }
                        }
                    });
                });
            });

        action
    }

    fn maintenance_section(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        admin: &AdminState,
    ) -> Option<PanelAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("Limpiar nunaciones").clicked() {
                action = Some(PanelAction::Admin(AdminAction::CleanNunation));
            }
            if ui.add_enabled(!admin.duplicates_loading(), egui::Button::new("Buscar duplicados")).clicked()
            {
                action = Some(PanelAction::Admin(AdminAction::FindDuplicates));
            }
            if admin.duplicates_loading() {
                ui.add(egui::Spinner::new());
            }
        });

        let Some(groups) = admin.duplicates() else {
            return action;
        };

        ui.add_space(6.0);
        if groups.is_empty() {
            ui.label(egui::RichText::new("No hay duplicados").color(theme.comment(ui.ctx())));
            return action;
        }

        ui.label(format!("{} grupo(s) con el mismo árabe", groups.len()));
        for group in groups {
            if let Some(a) = self.duplicate_group(ui, theme, group) {
                action = Some(a);
            }
        }

        action
    }

    fn duplicate_group(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        group: &DuplicateGroup,
    ) -> Option<PanelAction> {
        let mut action = None;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&group.arabic).size(18.0).color(theme.accent(ui.ctx())));

            let first = group.cards.first().map(|card| card.id).unwrap_or_default();
            let keep = self.keep.entry(group.arabic.clone()).or_insert(first);
            if !group.contains(*keep) {
                *keep = first;
            }
            for card in &group.cards {
                let label = format!("[{}] {} · {}", card.id, card.spanish, card.category_label());
                ui.horizontal(|ui| {
                    ui.radio_value(keep, card.id, label);
                    if ui.small_button("Editar").clicked() {
                        action = Some(PanelAction::EditCard(card.clone()));
                    }
                });
            }

            if ui.button("Conservar la seleccionada").clicked() {
                let keep = AdminAction::KeepDuplicate { keep: *keep, group: group.clone() };
                action = Some(PanelAction::Admin(keep));
            }
        });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Flashcard;

    fn card(id: i64) -> Flashcard {
        Flashcard { id, spanish: "casa".into(), arabic: "بيت".into(), phonetic: None, category: None }
    }

    #[test]
    fn test_destructive_actions_need_confirmation() {
        assert!(confirmation_message(&AdminAction::DeleteCategory(4)).unwrap().contains('4'));
        assert!(confirmation_message(&AdminAction::DeleteCard(7)).is_some());
        assert!(confirmation_message(&AdminAction::CleanNunation).is_some());
        assert!(confirmation_message(&AdminAction::Refresh).is_none());
        assert!(confirmation_message(&AdminAction::FindDuplicates).is_none());
    }

    #[test]
    fn test_keep_duplicate_message_counts_removals() {
        let group = DuplicateGroup { arabic: "بيت".into(), cards: vec![card(1), card(2), card(3)] };
        let message =
            confirmation_message(&AdminAction::KeepDuplicate { keep: 2, group }).unwrap();
        assert!(message.contains("borrar 2"));
    }
}
