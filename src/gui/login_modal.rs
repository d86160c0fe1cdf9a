use eframe::egui;

use crate::{
    controller::LoginForm,
    gui::theme::Theme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    Submit,
    Cancel,
}

pub struct LoginModal;

impl LoginModal {
    pub fn show(ctx: &egui::Context, theme: &Theme, form: &mut LoginForm) -> Option<LoginAction> {
        let mut action = None;

        let modal = egui::Modal::new(egui::Id::new("login_modal")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.label(theme.heading(ui.ctx(), "Acceso de administrador"));
            ui.add_space(10.0);

            ui.add_enabled_ui(!form.submitting, |ui| {
                egui::Grid::new("login_fields").num_columns(2).spacing([8.0, 8.0]).show(ui, |ui| {
                    ui.label("Correo");
                    ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(220.0));
                    ui.end_row();

                    ui.label("Contraseña");
                    let password = ui.add(
                        egui::TextEdit::singleline(&mut form.password)
                            .password(true)
                            .desired_width(220.0),
                    );
                    if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action = Some(LoginAction::Submit);
                    }
                    ui.end_row();
                });
            });

            if let Some(error) = &form.error {
                ui.add_space(6.0);
                ui.colored_label(theme.red(ui.ctx()), error);
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if form.submitting {
                    ui.add(egui::Spinner::new());
                    ui.label("Entrando...");
                } else {
                    if ui.button("Entrar").clicked() {
                        action = Some(LoginAction::Submit);
                    }
                    if ui.button("Cancelar").clicked() {
                        action = Some(LoginAction::Cancel);
                    }
                }
            });
        });

        if action.is_none() && modal.should_close() && !form.submitting {
            action = Some(LoginAction::Cancel);
        }
        action
    }
}
