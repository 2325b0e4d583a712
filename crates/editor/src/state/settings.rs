//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{
    default_furniture, default_swatches, ColorSwatch, FurnitureItem, OpeningCatalog, Rgb,
    RoomDimensions,
};

use crate::i18n::Lang;

/// Wall construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSettings {
    /// Thickness of perimeter and interior walls
    pub thickness: f32,
    /// Initial shared wall color
    pub color: Rgb,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            thickness: 0.1,
            color: Rgb([0xd9, 0xd9, 0xd9]),
        }
    }
}

/// Grid display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Show grid
    pub visible: bool,
    /// Grid cell size
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: false,
            size: 1.0,
            range: 10,
            opacity: 0.6,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    pub background: Rgb,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Initial camera position; the camera looks at the origin
    pub camera_eye: [f32; 3],
    /// Upper bound on the device pixel ratio used for rendering
    pub max_pixel_ratio: f32,
    /// Orbit damping factor, 0 disables damping
    pub damping: f32,
    /// Draw projected shadows on the floor
    pub shadows: bool,
    pub grid: GridSettings,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            fov: 75.0,
            camera_eye: [5.0, 6.0, 8.0],
            max_pixel_ratio: 1.5,
            damping: 0.05,
            shadows: true,
            grid: GridSettings::default(),
        }
    }
}

/// Light rig settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingSettings {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub directional_color: Rgb,
    pub directional_intensity: f32,
    /// Directional light position; it shines toward the origin
    pub directional_position: [f32; 3],
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            ambient_color: Rgb::WHITE,
            ambient_intensity: 0.5,
            directional_color: Rgb::WHITE,
            directional_intensity: 1.5,
            directional_position: [8.0, 10.0, 5.0],
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    #[serde(default)]
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::default(),
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Room generated at startup and shown in the dimension fields
    pub room: RoomDimensions,
    pub wall: WallSettings,
    pub floor_color: Rgb,
    pub openings: OpeningCatalog,
    pub furniture: Vec<FurnitureItem>,
    pub swatches: Vec<ColorSwatch>,
    pub viewport: ViewportSettings,
    pub lighting: LightingSettings,
    pub ui: UiSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            room: RoomDimensions::default(),
            wall: WallSettings::default(),
            floor_color: Rgb::WHITE,
            openings: OpeningCatalog::default(),
            furniture: default_furniture(),
            swatches: default_swatches(),
            viewport: ViewportSettings::default(),
            lighting: LightingSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "roomeditor", "room-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the platform config directory, or defaults
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&json).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
    }

    /// Save settings to the platform config directory
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if std::fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("Failed to serialize settings: {e}"),
        }
    }
}
