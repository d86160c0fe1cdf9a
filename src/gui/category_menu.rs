use eframe::egui;

use crate::{
    core::Category,
    gui::theme::Theme,
};

pub struct CategoryMenu;

impl CategoryMenu {
    /// Side panel listing the categories. Returns the one clicked this frame.
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        categories: &[Category],
        loading: bool,
        selected: Option<i64>,
    ) -> Option<Category> {
        let mut clicked = None;

        egui::SidePanel::left("category_menu").resizable(true).default_width(280.0).show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label(theme.heading(ui.ctx(), "Temario"));
            ui.separator();

            if loading && categories.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new("Cargando pistas...").color(theme.comment(ui.ctx())),
                    );
                });
                return;
            }

            if categories.is_empty() {
                ui.label(egui::RichText::new("No hay pistas").color(theme.comment(ui.ctx())));
                return;
            }

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for category in categories {
                    if Self::entry(ui, theme, category, selected == Some(category.id)).clicked() {
                        clicked = Some(category.clone());
                    }
                }
            });
        });

        clicked
    }

    fn entry(ui: &mut egui::Ui, theme: &Theme, category: &Category, selected: bool) -> egui::Response {
        let fill = if selected { theme.accent_soft(ui.ctx()) } else { egui::Color32::TRANSPARENT };

        let response = egui::Frame::new()
            .fill(fill)
            .inner_margin(egui::Margin::symmetric(8, 6))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    let badge = egui::RichText::new(category.id.to_string())
                        .small()
                        .strong()
                        .color(theme.accent(ui.ctx()));
                    egui::Frame::new()
                        .fill(theme.accent_soft(ui.ctx()))
                        .corner_radius(4.0)
                        .inner_margin(egui::Margin::symmetric(6, 2))
                        .show(ui, |ui| ui.label(badge));

                    let title = egui::RichText::new(category.display_title());
                    ui.label(if selected { title.color(theme.accent(ui.ctx())).strong() } else { title });
                });
            })
            .response;

        response.interact(egui::Sense::click()).on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}
