//! Keyboard shortcut handling

use eframe::egui;
use shared::EditorMode;

use super::AppState;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let mode = ctx.input(|i| {
        if i.modifiers.command {
            return None;
        }
        shortcut_mode(|key| i.key_pressed(key))
    });

    if let Some(mode) = mode {
        state.editor.set_mode(mode);
    }
}

/// Mode for the first pressed shortcut key. Escape drops whatever tool is
/// active, pending wall start included, and returns to translate.
fn shortcut_mode(pressed: impl Fn(egui::Key) -> bool) -> Option<EditorMode> {
    const BINDINGS: [(egui::Key, EditorMode); 5] = [
        (egui::Key::W, EditorMode::Translate),
        (egui::Key::E, EditorMode::Rotate),
        (egui::Key::R, EditorMode::Scale),
        (egui::Key::Q, EditorMode::Select),
        (egui::Key::Escape, EditorMode::Translate),
    ];
    BINDINGS
        .iter()
        .find(|(key, _)| pressed(*key))
        .map(|(_, mode)| *mode)
}
