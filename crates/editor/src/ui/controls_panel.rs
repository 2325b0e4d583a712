//! Left-hand controls: room size, tools, furniture and wall color

use egui::Ui;
use shared::{EditorMode, Rgb};

use crate::app::menus::{pick_model_file, view_toggles};
use crate::app::AppState;
use crate::i18n::{mode_label, t};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    room_section(ui, state);
    ui.separator();
    mode_section(ui, state);
    ui.separator();
    furniture_section(ui, state);
    ui.separator();
    wall_color_section(ui, state);
    ui.separator();

    ui.strong(t("view.title"));
    view_toggles(ui, state);
}

fn room_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong(t("room.title"));

    let mut submitted = false;
    let mut height_edited = false;
    egui::Grid::new("room_fields")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            let form = &mut state.room_form;
            for (key, text) in [
                ("room.width", &mut form.width),
                ("room.depth", &mut form.depth),
                ("room.height", &mut form.height),
            ] {
                ui.label(t(key));
                let response = ui.add(egui::TextEdit::singleline(text).desired_width(90.0));
                // Enter in any field builds the room
                submitted |= response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                height_edited |= key == "room.height" && response.changed();
                ui.end_row();
            }
        });

    // Interior walls take their height from this field as typed
    if height_edited {
        state.editor.set_height_input(&state.room_form.height);
    }

    if ui.button(t("room.generate")).clicked() || submitted {
        state.generate_room();
    }
    if let Some(err) = &state.room_error {
        ui.colored_label(egui::Color32::from_rgb(230, 90, 90), format!("{}: {err}", t("room.invalid")));
    }
}

fn mode_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong(t("mode.title"));

    let active = state.editor.mode();
    ui.horizontal_wrapped(|ui| {
        for &mode in EditorMode::all() {
            if ui.selectable_label(active == mode, mode_label(mode)).clicked() {
                state.editor.set_mode(mode);
            }
        }
    });
}

fn furniture_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong(t("furniture.title"));

    let enabled = state.loader.is_some();
    let mut requested = None;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal_wrapped(|ui| {
            for item in &state.editor.settings.furniture {
                if ui.button(&item.label).on_hover_text(&item.path).clicked() {
                    requested = Some(std::path::PathBuf::from(&item.path));
                }
            }
        });
        if ui.button(t("furniture.open")).clicked() {
            requested = pick_model_file();
        }
    });

    if let Some(path) = requested {
        state.load_model(path);
    }
}

fn wall_color_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong(t("wall.color"));

    let current = state.editor.host.wall_material.color;
    let mut chosen = None;
    ui.horizontal_wrapped(|ui| {
        for swatch in &state.editor.settings.swatches {
            let [r, g, b] = swatch.color.0;
            let fill = egui::Color32::from_rgb(r, g, b);
            let button = egui::Button::new("")
                .fill(fill)
                .min_size(egui::vec2(22.0, 22.0))
                .selected(swatch.color == current);
            if ui.add(button).on_hover_text(&swatch.label).clicked() {
                chosen = Some(swatch.color);
            }
        }
    });

    ui.horizontal(|ui| {
        ui.label(t("wall.custom"));
        let mut rgb = current.0;
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            chosen = Some(Rgb(rgb));
        }
    });

    if let Some(color) = chosen {
        state.editor.set_wall_color(color);
    }
}
