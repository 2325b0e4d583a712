use egui::Ui;

use crate::app::AppState;
use crate::i18n::{mode_label, t};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let loading = state.loads_in_flight();
    let editor = &mut state.editor;
    ui.horizontal(|ui| {
        ui.label(format!("{}: {}", t("status.mode"), mode_label(editor.mode())));
        ui.separator();

        let room = editor.room();
        ui.weak(format!(
            "{}: {} × {} × {}",
            t("status.room"),
            room.width,
            room.depth,
            room.height
        ));
        ui.separator();

        ui.weak(format!("{}: {}", t("status.walls"), editor.registry.walls().len()));
        ui.weak(format!("{}: {}", t("status.models"), editor.models().len()));

        if let Some(node) = editor.gizmo.attached().and_then(|id| editor.host.graph.get(id)) {
            ui.separator();
            ui.label(format!("{}: {}", t("status.selected"), node.name));
        }

        if loading > 0 {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(255, 200, 100),
                format!("{} ({loading})", t("furniture.loading")),
            );
        }

        if let Some(err) = editor.last_load_error() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(230, 90, 90), t("furniture.failed"))
                .on_hover_text(err);
            if ui.small_button("×").on_hover_text(t("status.dismiss")).clicked() {
                editor.clear_load_error();
            }
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("Room Editor v", env!("CARGO_PKG_VERSION")));
        });
    });
}
