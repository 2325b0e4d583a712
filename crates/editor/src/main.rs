mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::scene`, `crate::state`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use room_editor_lib::i18n;
pub use room_editor_lib::loader;
pub use room_editor_lib::scene;
pub use room_editor_lib::state;

use app::RoomEditorApp;
use state::EditorSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "room_editor=info,room_editor_lib=info".into()),
        )
        .init();

    let settings = parse_config_arg().unwrap_or_else(EditorSettings::load);
    i18n::set_lang(settings.ui.language);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Room Editor")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        depth_buffer: 24,
        // Planar shadows are masked to the floor through the stencil
        stencil_buffer: 8,
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "room-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(RoomEditorApp::new(cc, settings)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Settings from `--config <path>`, if given and readable
fn parse_config_arg() -> Option<EditorSettings> {
    let args: Vec<String> = std::env::args().collect();
    let index = args.iter().position(|a| a == "--config")?;
    let Some(path) = args.get(index + 1) else {
        tracing::error!("--config needs a path");
        return None;
    };
    match EditorSettings::load_from(std::path::Path::new(path)) {
        Ok(settings) => {
            tracing::info!("Loaded settings from {path}");
            Some(settings)
        }
        Err(e) => {
            tracing::error!("{e}; using saved settings");
            None
        }
    }
}
