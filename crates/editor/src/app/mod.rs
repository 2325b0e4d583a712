//! Main application module

mod keyboard;
pub(crate) mod menus;
mod styles;

use eframe::egui;

use crate::loader::ModelLoader;
use crate::state::{Editor, EditorSettings};
use crate::ui::{controls_panel, properties, status_bar};
use crate::viewport::ViewportPanel;

/// Text of the room dimension fields, parsed only on "Create room"
pub struct RoomForm {
    pub width: String,
    pub depth: String,
    pub height: String,
}

impl RoomForm {
    fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            width: settings.room.width.to_string(),
            depth: settings.room.depth.to_string(),
            height: settings.room.height.to_string(),
        }
    }
}

/// Everything the panels read and mutate
pub struct AppState {
    pub editor: Editor,
    /// Background glTF importer; `None` if its runtime failed to start
    pub loader: Option<ModelLoader>,
    pub room_form: RoomForm,
    /// Last rejected dimension input, shown under the fields
    pub room_error: Option<String>,
    pub show_properties: bool,
}

impl AppState {
    pub fn new(settings: EditorSettings) -> Self {
        let room_form = RoomForm::from_settings(&settings);
        let loader = ModelLoader::new()
            .map_err(|e| tracing::error!("Model loader unavailable: {e}"))
            .ok();
        Self {
            editor: Editor::new(settings),
            loader,
            room_form,
            room_error: None,
            show_properties: true,
        }
    }

    /// Start an import at the origin
    pub fn load_model(&mut self, path: std::path::PathBuf) {
        match self.loader.as_mut() {
            Some(loader) => {
                loader.load(path, glam::Vec3::ZERO);
            }
            None => tracing::error!("Cannot load {}: model loader unavailable", path.display()),
        }
    }

    pub fn loads_in_flight(&self) -> usize {
        self.loader.as_ref().map_or(0, ModelLoader::in_flight)
    }

    /// Parse the dimension fields and rebuild the room
    pub fn generate_room(&mut self) {
        let form = &self.room_form;
        match self
            .editor
            .generate_room_from_text(&form.width, &form.depth, &form.height)
        {
            Ok(_) => self.room_error = None,
            Err(e) => {
                tracing::warn!("Room not generated: {e}");
                self.room_error = Some(e.to_string());
            }
        }
    }

    /// Hand finished imports to the editor
    fn drain_loads(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        for outcome in loader.poll() {
            self.editor.apply_load_outcome(outcome);
        }
    }
}

/// Main application
pub struct RoomEditorApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl RoomEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: EditorSettings) -> Self {
        let state = AppState::new(settings);

        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, state.editor.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = state.editor.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
        }
    }
}

impl eframe::App for RoomEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let font_size = self.state.editor.settings.ui.font_size;
        if font_size != self.last_font_size {
            styles::apply_font_size(ctx, font_size);
            self.last_font_size = font_size;
        }

        self.state.drain_loads();
        keyboard::handle_keyboard(ctx, &mut self.state);

        // Render loop: keep ticking for camera damping and pending loads
        self.state.editor.update();
        ctx.request_repaint();

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state);
            });
        });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &mut self.state);
            });

        // ── Left panel: room controls ────────────────────────
        egui::SidePanel::left("controls")
            .default_width(230.0)
            .width_range(180.0..=360.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| {
                        controls_panel::show(ui, &mut self.state);
                    });
            });

        // ── Right panel: Properties ──────────────────────────
        if self.state.show_properties {
            egui::SidePanel::right("right_panel")
                .default_width(250.0)
                .width_range(200.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("props_scroll")
                        .show(ui, |ui| {
                            properties::show(ui, &mut self.state.editor);
                        });
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state.editor);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy(gl);
        }
        self.state.editor.settings.save();
    }
}
