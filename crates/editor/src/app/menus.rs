//! Application menu bar

use eframe::egui;

use super::AppState;
use crate::i18n::{lang, set_lang, t, Lang};

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("furniture.open")).clicked() {
            ui.close_menu();
            if let Some(path) = pick_model_file() {
                state.load_model(path);
            }
        }
        if ui.button(t("menu.save_settings")).clicked() {
            state.editor.settings.save();
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.show_properties, t("menu.properties"));
        ui.separator();
        view_toggles(ui, state);
        ui.separator();
        if ui.button(t("view.reset_camera")).clicked() {
            let editor = &mut state.editor;
            editor.host.reset_camera(&editor.settings.viewport);
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("view.language"), |ui| {
            for l in Lang::all() {
                if ui.selectable_label(lang() == l, l.label()).clicked() {
                    set_lang(l);
                    state.editor.settings.ui.language = l;
                    ui.close_menu();
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label(t("view.font_size"));
            ui.add(
                egui::DragValue::new(&mut state.editor.settings.ui.font_size)
                    .range(10.0..=24.0)
                    .speed(0.5),
            );
        });
    });
}

/// Grid and shadow checkboxes, kept in step with the saved settings
pub fn view_toggles(ui: &mut egui::Ui, state: &mut AppState) {
    let editor = &mut state.editor;
    ui.checkbox(&mut editor.settings.viewport.grid.visible, t("view.grid"));
    if ui.checkbox(&mut editor.host.shadows, t("view.shadows")).changed() {
        editor.settings.viewport.shadows = editor.host.shadows;
    }
}

/// Native file dialog for glTF models
pub fn pick_model_file() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(t("furniture.open_title"))
        .add_filter("glTF", &["gltf", "glb"])
        .pick_file()
}
