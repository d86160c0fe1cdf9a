use eframe::egui;

pub struct Modal<T> {
    pub open: bool,
    pub title: String,
    pub data: T,
    pub config: ModalConfig,
}

/// Configuration for modal appearance and behavior
#[derive(Clone)]
pub struct ModalConfig {
    pub resizable: bool,
    pub min_size: Option<egui::Vec2>,
    /// Whether to show a dark overlay behind the modal
    pub show_overlay: bool,
    /// Whether clicking outside the modal should close it
    pub close_on_outside_click: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            resizable: false,
            min_size: Some(egui::Vec2::new(320.0, 120.0)),
            show_overlay: true,
            close_on_outside_click: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ModalResult<T> {
    Confirmed(T),
    Cancelled,
}

impl<T: Default> Modal<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self { open: false, title: title.into(), data: T::default(), config: ModalConfig::default() }
    }
}

impl<T> Modal<T> {
    pub fn with_config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn open_with(&mut self, title: impl Into<String>, data: T) {
        self.title = title.into();
        self.data = data;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show<F>(&mut self, ctx: &egui::Context, content: F) -> Option<ModalResult<T>>
    where
        F: FnOnce(&mut egui::Ui, &mut T) -> Option<ModalResult<T>>,
    {
        if !self.open {
            return None;
        }

        let close_from_outside_click = self.config.show_overlay && self.show_overlay(ctx);

        let mut window = egui::Window::new(&self.title)
            .collapsible(false)
            .resizable(self.config.resizable)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO);

        if let Some(min_size) = self.config.min_size {
            window = window.min_size(min_size);
        }

        let mut result = None;
        window.show(ctx, |ui| {
            result = content(ui, &mut self.data);
        });

        if result.is_none() && close_from_outside_click && self.config.close_on_outside_click {
            result = Some(ModalResult::Cancelled);
        }
        if result.is_some() {
            self.open = false;
        }

        result
    }

    fn show_overlay(&self, ctx: &egui::Context) -> bool {
        let area_response = egui::Area::new(egui::Id::new("modal_overlay"))
            .order(egui::Order::Background)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                let (_rect, response) =
                    ui.allocate_exact_size(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(100));
                response.clicked()
            });

        area_response.inner
    }
}

pub fn action_buttons<T>(
    ui: &mut egui::Ui,
    data: &T,
    confirm_text: &str,
    cancel_text: &str,
) -> Option<ModalResult<T>>
where
    T: Clone,
{
    ui.horizontal(|ui| {
        if ui.button(confirm_text).clicked() {
            Some(ModalResult::Confirmed(data.clone()))
        } else if ui.button(cancel_text).clicked() {
            Some(ModalResult::Cancelled)
        } else {
            None
        }
    })
    .inner
}

/// Yes/no prompt carrying the value to act on once confirmed.
pub fn confirmation_dialog<T: Clone>(
    modal: &mut Modal<T>,
    ctx: &egui::Context,
    message: &str,
) -> Option<ModalResult<T>> {
    modal.show(ctx, |ui, data| {
        ui.label(message);
        ui.add_space(10.0);
        action_buttons(ui, data, "Sí", "No")
    })
}
