mod modals;

use std::{
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
};

use eframe::egui;
use modals::Modals;

use super::{
    admin_panel::{
        confirmation_message,
        AdminPanel,
        PanelAction,
    },
    category_menu::CategoryMenu,
    crash_guard::CrashGuard,
    flashcard_list::{
        CardAction,
        CardOptions,
    },
    login_modal::{
        LoginAction,
        LoginModal,
    },
    modal::{
        confirmation_dialog,
        ModalResult,
    },
    study_view::{
        study_view,
        StudyAction,
    },
    theme::{
        apply_dark_mode,
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarAction,
    },
};
use crate::{
    config::AppConfig,
    controller::{
        AdminAction,
        NoticeKind,
        RootController,
        Tab,
    },
    core::{
        tasks::TaskManager,
        TarjetasError,
    },
    remote::RemoteDataService,
};

const ARABIC_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/google-noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

enum ViewAction {
    Study(StudyAction),
    Admin(PanelAction),
}

pub struct TarjetasApp {
    controller: RootController,
    config: AppConfig,
    theme: Theme,
    modals: Modals,
    guard: CrashGuard,
    admin_panel: AdminPanel,
    status: Option<String>,
}

impl TarjetasApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        service: Arc<dyn RemoteDataService>,
    ) -> Result<Self, TarjetasError> {
        let mut controller = RootController::new(TaskManager::new(service)?);

        let ctx = cc.egui_ctx.clone();
        controller.set_repaint_hook(move || ctx.request_repaint());
        controller.start();

        let app = Self {
            controller,
            config,
            theme: Theme::emerald(),
            modals: Modals::default(),
            guard: CrashGuard::new(),
            admin_panel: AdminPanel::new(),
            status: None,
        };

        setup_fonts(&cc.egui_ctx, app.config.arabic_font_path.as_deref());
        cc.egui_ctx.set_zoom_factor(cc.egui_ctx.zoom_factor() + 0.2);
        set_theme(&cc.egui_ctx, &app.theme);
        apply_dark_mode(&cc.egui_ctx, app.config.dark_mode);

        Ok(app)
    }

    fn take_notices(&mut self) {
        if self.modals.error.is_open() {
            return;
        }

        while let Some(notice) = self.controller.take_notice() {
            match notice.kind {
                NoticeKind::Info => self.status = Some(notice.message),
                NoticeKind::Error => {
                    self.modals.error.show_error(notice.title, notice.message);
                    break;
                }
            }
        }
    }

    fn handle_top_bar(&mut self, action: TopBarAction) {
        match action {
            TopBarAction::Back => self.controller.clear_selection(),
            TopBarAction::Login => self.controller.request_login(),
            TopBarAction::Logout => {
                self.controller.logout();
                self.admin_panel = AdminPanel::new();
                self.status = Some("Sesión cerrada".to_string());
            }
            TopBarAction::SwitchTab(tab) => {
                self.controller.switch_tab(tab);
            }
            TopBarAction::SettingsChanged => self.config.save_preferences(),
        }
    }

    fn central_view(&mut self, ui: &mut egui::Ui) {
        let theme = &self.theme;
        let controller = &self.controller;

        let action = match controller.tab() {
            Tab::Study => {
                let options = CardOptions {
                    front: self.config.front_language,
                    show_diacritics: self.config.show_diacritics,
                    is_admin: controller.is_admin(),
                };
                self.guard
                    .show(ui, theme, |ui| {
                        study_view(ui, theme, controller.selected(), controller.deck(), &options)
                    })
                    .flatten()
                    .map(ViewAction::Study)
            }
            Tab::Admin => {
                let admin_panel = &mut self.admin_panel;
                self.guard
                    .show(ui, theme, |ui| {
                        admin_panel.show(ui, theme, controller.categories(), controller.admin())
                    })
                    .flatten()
                    .map(ViewAction::Admin)
            }
        };

        match action {
            Some(ViewAction::Study(action)) => self.handle_study_action(action),
            Some(ViewAction::Admin(PanelAction::Admin(action))) => self.request_admin_action(action),
            Some(ViewAction::Admin(PanelAction::EditCard(card))) => {
                self.modals.card_editor.open_edit(&card)
            }
            None => {}
        }
    }

    fn handle_study_action(&mut self, action: StudyAction) {
        match action {
            StudyAction::Card(CardAction::Flip(id)) => self.controller.deck_mut().toggle_revealed(id),
            StudyAction::Card(CardAction::Edit(card)) => self.modals.card_editor.open_edit(&card),
            StudyAction::Card(CardAction::Delete(card)) => {
                self.request_admin_action(AdminAction::DeleteCard(card.id))
            }
            StudyAction::NewCard => {
                let category = self.controller.selected().map(|c| c.display_title());
                self.modals.card_editor.open_new(category);
            }
        }
    }

    fn request_admin_action(&mut self, action: AdminAction) {
        match confirmation_message(&action) {
            Some(message) => self.modals.ask(message, action),
            None => self.controller.apply_admin_action(action),
        }
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        let login_action = self
            .controller
            .login_form_mut()
            .and_then(|form| LoginModal::show(ctx, &self.theme, form));
        match login_action {
            Some(LoginAction::Submit) => self.controller.submit_login(),
            Some(LoginAction::Cancel) => self.controller.cancel_login(),
            None => {}
        }

        if let Some(action) = self.modals.card_editor.show(ctx) {
            self.controller.apply_admin_action(action);
        }

        let message = self.modals.confirm_message.clone();
        if let Some(ModalResult::Confirmed(Some(action))) =
            confirmation_dialog(&mut self.modals.confirm, ctx, &message)
        {
            self.controller.apply_admin_action(action);
        }

        self.modals.error.show(ctx, &self.theme);
    }

    fn status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.controller.admin().is_busy() {
                    ui.add(egui::Spinner::new().size(12.0));
                }
                if let Some(status) = &self.status {
                    ui.small(status);
                }
            });
        });
    }
}

impl eframe::App for TarjetasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        self.take_notices();

        if let Some(action) = TopBar::show(ctx, &self.theme, &self.controller, &mut self.config) {
            self.handle_top_bar(action);
        }

        if let Some(category) = CategoryMenu::show(
            ctx,
            &self.theme,
            self.controller.categories(),
            self.controller.categories_loading(),
            self.controller.selected().map(|c| c.id),
        ) {
            self.controller.select_category(category);
        }

        self.status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| self.central_view(ui));

        self.show_modals(ctx);
    }
}

/// The default egui fonts carry no Arabic glyphs, so one is appended as a fallback.
fn setup_fonts(ctx: &egui::Context, configured: Option<&Path>) {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(ARABIC_FONT_CANDIDATES.iter().map(PathBuf::from));

    let Some((path, bytes)) =
        candidates.into_iter().find_map(|path| std::fs::read(&path).ok().map(|bytes| (path, bytes)))
    else {
        log::warn!("No Arabic font found, set arabic_font_path in settings.json");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert("arabic".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));

    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("arabic".to_owned());
    }

    ctx.set_fonts(fonts);
    log::info!("Loaded Arabic font from {}", path.display());
}
