use eframe::egui::{
    self,
    RichText,
};
use egui::{
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::emerald()
    }
}

impl Theme {
    pub fn emerald() -> Self {
        Theme { dark: ThemeDetails::emerald_night(), light: ThemeDetails::emerald_day() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.accent(ctx)).strong()
    }

    pub fn accent(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).emerald
    }

    pub fn accent_soft(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).emerald_soft
    }

    pub fn red(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).red
    }

    pub fn blue(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).blue
    }

    pub fn amber(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).amber
    }

    pub fn comment(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).comment
    }

    pub fn card_fill(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).background_lighter
    }
}

#[derive(Clone)]
pub struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    red: Color32,
    amber: Color32,
    blue: Color32,
    emerald: Color32,
    emerald_soft: Color32,
    background_darker: Color32,
    background_dark: Color32,
    background_light: Color32,
    background_lighter: Color32,
}

impl ThemeDetails {
    // Tailwind emerald/slate scale
    fn emerald_day() -> Self {
        Self {
            background: Color32::from_rgb(249, 250, 251),
            foreground: Color32::from_rgb(31, 41, 55),
            selection: Color32::from_rgb(209, 250, 229),
            comment: Color32::from_rgb(100, 116, 139),
            red: Color32::from_rgb(239, 68, 68),
            amber: Color32::from_rgb(217, 119, 6),
            blue: Color32::from_rgb(59, 130, 246),
            emerald: Color32::from_rgb(5, 150, 105),
            emerald_soft: Color32::from_rgb(236, 253, 245),
            background_darker: Color32::from_rgb(229, 231, 235),
            background_dark: Color32::from_rgb(243, 244, 246),
            background_light: Color32::from_rgb(255, 255, 255),
            background_lighter: Color32::from_rgb(255, 255, 255),
        }
    }

    fn emerald_night() -> Self {
        Self {
            background: Color32::from_rgb(17, 24, 39),
            foreground: Color32::from_rgb(229, 231, 235),
            selection: Color32::from_rgb(6, 78, 59),
            comment: Color32::from_rgb(148, 163, 184),
            red: Color32::from_rgb(248, 113, 113),
            amber: Color32::from_rgb(251, 191, 36),
            blue: Color32::from_rgb(96, 165, 250),
            emerald: Color32::from_rgb(52, 211, 153),
            emerald_soft: Color32::from_rgb(6, 46, 36),
            background_darker: Color32::from_rgb(3, 7, 18),
            background_dark: Color32::from_rgb(11, 17, 30),
            background_light: Color32::from_rgb(31, 41, 55),
            background_lighter: Color32::from_rgb(38, 50, 68),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

pub fn apply_dark_mode(ctx: &egui::Context, dark_mode: bool) {
    let (theme, preference) = if dark_mode {
        (egui::Theme::Dark, egui::ThemePreference::Dark)
    } else {
        (egui::Theme::Light, egui::ThemePreference::Light)
    };
    ctx.set_theme(theme);
    ctx.options_mut(|o| o.theme_preference = preference);
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: WidgetVisuals {
                    bg_fill: theme.background,
                    weak_bg_fill: theme.background_lighter,
                    bg_stroke: Stroke {
                        color: theme.background_darker,
                        ..default.widgets.noninteractive.bg_stroke
                    },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.noninteractive.fg_stroke
                    },
                    ..default.widgets.noninteractive
                },
                inactive: WidgetVisuals {
                    bg_fill: theme.background_light,
                    weak_bg_fill: theme.background_light,
                    bg_stroke: Stroke {
                        color: theme.background_darker,
                        ..default.widgets.inactive.bg_stroke
                    },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.inactive.fg_stroke
                    },
                    ..default.widgets.inactive
                },
                hovered: WidgetVisuals {
                    bg_fill: theme.selection,
                    weak_bg_fill: theme.emerald_soft,
                    bg_stroke: Stroke { color: theme.emerald, ..default.widgets.hovered.bg_stroke },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.hovered.fg_stroke
                    },
                    ..default.widgets.hovered
                },
                active: WidgetVisuals {
                    bg_fill: theme.selection,
                    weak_bg_fill: theme.selection,
                    bg_stroke: Stroke { color: theme.emerald, ..default.widgets.active.bg_stroke },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.active.fg_stroke
                    },
                    ..default.widgets.active
                },
                open: WidgetVisuals {
                    bg_fill: theme.background_dark,
                    weak_bg_fill: theme.background_lighter,
                    bg_stroke: Stroke { color: theme.emerald, ..default.widgets.open.bg_stroke },
                    fg_stroke: Stroke { color: theme.foreground, ..default.widgets.open.fg_stroke },
                    ..default.widgets.open
                },
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.emerald,
            faint_bg_color: theme.background_dark,
            extreme_bg_color: theme.background_light,
            code_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            warn_fg_color: theme.amber,
            window_shadow: Shadow { color: theme.background_darker, ..default.window_shadow },
            window_fill: theme.background_light,
            window_stroke: Stroke { color: theme.background_darker, ..default.window_stroke },
            panel_fill: theme.background,
            popup_shadow: Shadow { color: theme.background_dark, ..default.popup_shadow },
            ..default
        },
    );
}
