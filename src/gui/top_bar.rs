use eframe::egui::{
    self,
    containers,
};

use crate::{
    config::{
        AppConfig,
        FrontLanguage,
    },
    controller::{
        RootController,
        Tab,
    },
    gui::theme::{
        apply_dark_mode,
        Theme,
    },
};

const APP_TITLE: &str = "Español - Árabe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    Back,
    Login,
    Logout,
    SwitchTab(Tab),
    SettingsChanged,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        controller: &RootController,
        config: &mut AppConfig,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                match controller.selected() {
                    Some(category) => {
                        if ui.button("⬅").on_hover_text("Volver").clicked() {
                            action = Some(TopBarAction::Back);
                        }
                        ui.label(theme.heading(ui.ctx(), category.display_title()));
                    }
                    None => {
                        ui.label(egui::RichText::new("📖").color(theme.accent(ui.ctx())));
                        ui.label(theme.heading(ui.ctx(), APP_TITLE));
                    }
                }

                ui.add_space(12.0);

                if controller.is_admin() {
                    for (tab, label) in [(Tab::Study, "Estudio"), (Tab::Admin, "Administración")] {
                        if ui.selectable_label(controller.tab() == tab, label).clicked() {
                            action = Some(TopBarAction::SwitchTab(tab));
                        }
                    }
                }

                ui.menu_button("Ajustes", |ui| {
                    if Self::settings_menu(ui, config) {
                        action = Some(TopBarAction::SettingsChanged);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match controller.session().user.as_ref() {
                        Some(user) => {
                            if ui.button("Cerrar sesión").clicked() {
                                action = Some(TopBarAction::Logout);
                            }
                            ui.small(user.display_name());
                        }
                        None => {
                            if ui.button("Acceso admin").clicked() {
                                action = Some(TopBarAction::Login);
                            }
                        }
                    }
                });
            });
        });

        action
    }

    /// Returns true when a preference changed.
    fn settings_menu(ui: &mut egui::Ui, config: &mut AppConfig) -> bool {
        let mut changed = false;

        ui.label("Cara frontal");
        for language in [FrontLanguage::Spanish, FrontLanguage::Arabic] {
            changed |= ui
                .radio_value(&mut config.front_language, language, language.label())
                .changed();
        }

        ui.separator();
        changed |= ui.checkbox(&mut config.show_diacritics, "Mostrar harakat").changed();

        if ui.checkbox(&mut config.dark_mode, "Modo oscuro").changed() {
            apply_dark_mode(ui.ctx(), config.dark_mode);
            changed = true;
        }

        changed
    }
}
