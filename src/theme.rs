//! Light/dark theme. Colors come from the Nord themes in egui-aesthetix.

use eframe::egui::{self, Color32, Visuals};
use egui_aesthetix::themes::{NordDark, NordLight};
use egui_aesthetix::Aesthetix;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

/// Colors the workout grid needs, resolved from an aesthetix theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub accent: Color32,
    pub background: Color32,
    pub card: Color32,
    pub reached: Color32,
    pub complete: Color32,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Glyph for the toggle button: shows what clicking switches to.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette::from_aesthetix(&NordLight),
            Theme::Dark => Palette::from_aesthetix(&NordDark),
        }
    }

    pub fn visuals(self) -> Visuals {
        let palette = self.palette();
        let mut visuals = match self {
            Theme::Light => Visuals::light(),
            Theme::Dark => Visuals::dark(),
        };
        visuals.panel_fill = palette.background;
        visuals.window_fill = palette.background;
        visuals.selection.bg_fill = palette.accent;
        visuals.hyperlink_color = palette.accent;
        visuals
    }

    pub fn apply(self, ctx: &egui::Context) {
        ctx.set_visuals(self.visuals());
    }
}

impl Palette {
    fn from_aesthetix(theme: &dyn Aesthetix) -> Self {
        Palette {
            accent: convert(theme.primary_accent_color_visuals().to_array()),
            background: convert(theme.bg_primary_color_visuals().to_array()),
            card: convert(theme.bg_secondary_color_visuals().to_array()),
            reached: convert(theme.fg_warn_text_color_visuals().to_array()),
            complete: convert(theme.fg_success_text_color_visuals().to_array()),
        }
    }
}

// aesthetix may pin its own epaint, so go through raw bytes
fn convert([r, g, b, a]: [u8; 4]) -> Color32 {
    Color32::from_rgba_premultiplied(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn marker_and_icon_follow_theme() {
        assert_eq!(Theme::Light.marker(), "light");
        assert_eq!(Theme::Dark.marker(), "dark");
        assert_eq!(Theme::Light.icon(), "🌙");
        assert_eq!(Theme::Dark.icon(), "☀");
    }

    #[test]
    fn visuals_match_mode() {
        assert!(!Theme::Light.visuals().dark_mode);
        assert!(Theme::Dark.visuals().dark_mode);
        assert_ne!(Theme::Light.palette().background, Theme::Dark.palette().background);
    }

    #[test]
    fn goal_colors_are_distinct() {
        for theme in [Theme::Light, Theme::Dark] {
            let palette = theme.palette();
            assert_ne!(palette.reached, palette.complete);
        }
    }
}
