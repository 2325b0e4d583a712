//! Properties panel for the node the gizmo is attached to

use egui::Ui;
use glam::{EulerRot, Quat, Vec3};

use crate::i18n::t;
use crate::state::Editor;

pub fn show(ui: &mut Ui, editor: &mut Editor) {
    ui.heading(t("props.title"));
    ui.separator();

    let Some(id) = editor.gizmo.attached() else {
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("props.none"));
        });
        return;
    };

    let Some(node) = editor.host.graph.get_mut(id) else {
        // Attached node was removed by a room rebuild or carve
        editor.gizmo.detach();
        return;
    };

    egui::Grid::new("node_props")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(format!("{}:", t("props.name")));
            ui.strong(&node.name);
            ui.end_row();

            ui.label(format!("{}:", t("props.kind")));
            ui.label(node.role.label());
            ui.end_row();

            ui.label("ID:");
            ui.monospace(id.short());
            ui.end_row();
        });

    ui.add_space(6.0);
    let transform = &mut node.transform;

    ui.label(t("props.position"));
    vec3_row(ui, &mut transform.position, 0.05);

    ui.label(t("props.rotation"));
    let (x, y, z) = transform.rotation.to_euler(EulerRot::XYZ);
    let mut degrees = Vec3::new(x, y, z) * (180.0 / std::f32::consts::PI);
    if vec3_row(ui, &mut degrees, 1.0) {
        let r = degrees * (std::f32::consts::PI / 180.0);
        transform.rotation = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
    }

    ui.label(t("props.scale"));
    if vec3_row(ui, &mut transform.scale, 0.01) {
        transform.scale = transform.scale.max(Vec3::splat(0.01));
    }

    ui.add_space(8.0);
    if ui.button(t("props.deselect")).clicked() {
        editor.gizmo.detach();
    }
}

/// Three drag fields for x, y and z. Returns true if any changed.
fn vec3_row(ui: &mut Ui, v: &mut Vec3, speed: f64) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        for (label, value) in [("x", &mut v.x), ("y", &mut v.y), ("z", &mut v.z)] {
            ui.weak(label);
            changed |= ui
                .add(egui::DragValue::new(value).speed(speed).max_decimals(3))
                .changed();
        }
    });
    changed
}
