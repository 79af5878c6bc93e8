use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use eframe::{App, Frame, CreationContext, egui};
use egui::{Ui, ScrollArea, RichText, Layout, Align, Stroke, Vec2};
use egui_extras::{Size, StripBuilder};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod models;
mod routines;
mod scheduler;
mod theme;
mod tracker;

use config::{Config, LoggingConfig, CONFIG_FILE};
use error::AppError;
use models::{format_time, ExerciseDefinition, ExerciseState, GoalStatus};
use routines::{load_routine, ROUTINE_JSON};
use theme::{Palette, Theme};
use tracker::{ActionKind, Command, Tracker};

const CARD_WIDTH: f32 = 520.0;
const CARD_HEIGHT: f32 = 230.0;
const TILE_WIDTH: f32 = 140.0;

fn main() -> Result<(), AppError> {
    let config = Config::load(Path::new(CONFIG_FILE))?;
    init_logging(&config.logging);

    let definitions = load_routine(ROUTINE_JSON)?;
    info!("Workout Tracker v{} with {} exercises", env!("CARGO_PKG_VERSION"), definitions.len());

    let title = config.window.title.clone();
    let font_path = config.fonts.path.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title(title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if let Some(path) = font_path.as_deref() {
                install_font(&cc.egui_ctx, path);
            }
            Ok(Box::new(WorkoutApp::new(cc, definitions)))
        }),
    )?;

    info!("Workout Tracker closed");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn install_font(ctx: &egui::Context, path: &Path) {
    let font_data = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to open font file {}: {}, using default fonts", path.display(), e);
            return;
        }
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "custom".to_owned(),
        Arc::from(egui::FontData::from_owned(font_data)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().insert(0, "custom".to_owned());
    }
    ctx.set_fonts(fonts);
}

struct WorkoutApp {
    tracker: Tracker,
    applied_theme: Theme,
}

impl WorkoutApp {
    fn new(cc: &CreationContext, definitions: Vec<ExerciseDefinition>) -> Self {
        let tracker = Tracker::new(definitions);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(20.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(32.0, egui::FontFamily::Proportional),
        );
        cc.egui_ctx.set_style(style);

        let applied_theme = tracker.theme();
        applied_theme.apply(&cc.egui_ctx);

        WorkoutApp {
            tracker,
            applied_theme,
        }
    }
}

impl App for WorkoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Local::now();
        self.tracker.tick(now);

        let theme = self.tracker.theme();
        if theme != self.applied_theme {
            theme.apply(ctx);
            self.applied_theme = theme;
        }
        let palette = theme.palette();

        let mut commands = Vec::new();
        let mut toggle_theme = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Workout Tracker")
                        .heading()
                        .strong(),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui
                        .button(RichText::new(theme.icon()).size(28.0))
                        .on_hover_text("Toggle theme")
                        .clicked()
                    {
                        toggle_theme = true;
                    }
                });
            });
            ui.add_space(20.0);

            ScrollArea::vertical().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::splat(16.0);
                    for exercise in self.tracker.exercises() {
                        ui.push_id(exercise.id, |ui| {
                            show_exercise_card(ui, exercise, &palette, now, &mut commands);
                        });
                    }
                });
            });
        });

        for command in commands {
            self.tracker.dispatch(command, now);
        }
        if toggle_theme {
            self.tracker.toggle_theme();
        }

        if let Some(wakeup) = self.tracker.next_wakeup(Local::now()) {
            let delay = (wakeup - Local::now()).to_std().unwrap_or_default();
            ctx.request_repaint_after(delay);
        }
    }
}

fn show_exercise_card(
    ui: &mut Ui,
    exercise: &ExerciseState,
    palette: &Palette,
    now: DateTime<Local>,
    commands: &mut Vec<Command>,
) {
    let definition = &exercise.definition;
    let pulsing = exercise.pulse.is_some_and(|pulse| pulse.is_active(now));
    let stroke = match exercise.goal_status() {
        _ if pulsing => Stroke::new(6.0, palette.accent),
        GoalStatus::Complete => Stroke::new(3.0, palette.complete),
        GoalStatus::Reached => Stroke::new(3.0, palette.reached),
        GoalStatus::Neutral => ui.visuals().widgets.noninteractive.bg_stroke,
    };

    egui::Frame::group(ui.style())
        .fill(palette.card)
        .stroke(stroke)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.allocate_ui(Vec2::new(CARD_WIDTH, CARD_HEIGHT), |ui| {
                StripBuilder::new(ui)
                    .size(Size::exact(TILE_WIDTH))
                    .size(Size::remainder())
                    .horizontal(|mut strip| {
                        strip.cell(|ui| {
                            ui.centered_and_justified(|ui| {
                                ui.label(
                                    RichText::new(&definition.name)
                                        .size(22.0)
                                        .color(palette.accent)
                                        .strong(),
                                )
                                .on_hover_text(&definition.image);
                            });
                        });
                        strip.cell(|ui| {
                            show_card_content(ui, exercise, commands);
                        });
                    });
            });
        });
}

fn show_card_content(ui: &mut Ui, exercise: &ExerciseState, commands: &mut Vec<Command>) {
    let definition = &exercise.definition;
    ui.label(
        RichText::new(&definition.name)
            .size(26.0)
            .strong(),
    );
    ui.label(format!("Goal: {}", definition.rep_goal));
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(exercise.current_reps.to_string())
                .size(40.0)
                .strong(),
        );
        ui.add_space(12.0);
        control(ui, exercise.id, ActionKind::Increment, "Count Rep", commands);
        control(ui, exercise.id, ActionKind::ResetReps, "Reset", commands);
    });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format_time(exercise.timer_seconds))
                .size(32.0)
                .monospace(),
        );
        ui.add_space(12.0);
        control(ui, exercise.id, ActionKind::ToggleTimer, exercise.timer_label(), commands);
        control(ui, exercise.id, ActionKind::ResetTimer, "Reset", commands);
    });
}

fn control(ui: &mut Ui, exercise: usize, action: ActionKind, label: &str, commands: &mut Vec<Command>) {
    let clicked = ui
        .push_id(action.tag(), |ui| ui.button(RichText::new(label).size(20.0)).clicked())
        .inner;
    if clicked {
        commands.push(Command { action, exercise });
    }
}
