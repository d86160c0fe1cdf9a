use std::{
    any::Any,
    panic::{
        self,
        AssertUnwindSafe,
    },
};

use eframe::egui;

use crate::{
    core::TarjetasError,
    gui::theme::Theme,
};

/// Boundary around the main view. The first panic or error is logged and the
/// view is replaced by an error panel for the rest of the run.
#[derive(Default)]
pub struct CrashGuard {
    failure: Option<String>,
}

impl CrashGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Runs `body` unless an earlier call already failed.
    pub fn run<T>(&mut self, body: impl FnOnce() -> Result<T, TarjetasError>) -> Option<T> {
        if self.failure.is_some() {
            return None;
        }

        let message = match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        log::error!("Error caught in the main view: {message}");
        self.failure = Some(message);
        None
    }

    pub fn show<T>(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        body: impl FnOnce(&mut egui::Ui) -> Result<T, TarjetasError>,
    ) -> Option<T> {
        let result = self.run(|| body(ui));

        if let Some(message) = &self.failure {
            error_panel(ui, theme, message);
        }
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn error_panel(ui: &mut egui::Ui, theme: &Theme, message: &str) {
    ui.vertical(|ui| {
        ui.add_space(20.0);
        ui.label(egui::RichText::new("❌ Error en la aplicación").size(22.0).strong());
        ui.add_space(10.0);
        ui.label(egui::RichText::new(message).monospace().color(theme.red(ui.ctx())));
    });
}
