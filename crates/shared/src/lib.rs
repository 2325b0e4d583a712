use serde::{Deserialize, Serialize};

mod dimensions;

pub use dimensions::{parse_dimension, parse_length, DimensionError};

/// Room footprint and wall height, in scene units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl RoomDimensions {
    pub fn new(width: f32, depth: f32, height: f32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self::new(8.0, 6.0, 3.0)
    }
}

/// Kind of cavity carved into a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningKind {
    Window,
    Door,
}

impl OpeningKind {
    pub fn name(&self) -> &'static str {
        match self {
            OpeningKind::Window => "window",
            OpeningKind::Door => "door",
        }
    }

    /// Look up a kind by name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "window" => Some(OpeningKind::Window),
            "door" => Some(OpeningKind::Door),
            _ => None,
        }
    }

    pub fn all() -> &'static [OpeningKind] {
        &[OpeningKind::Window, OpeningKind::Door]
    }
}

/// Box dimensions of an opening cavity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningSize {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Cavity sizes per opening kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningCatalog {
    pub window: OpeningSize,
    pub door: OpeningSize,
}

impl OpeningCatalog {
    pub fn size(&self, kind: OpeningKind) -> OpeningSize {
        match kind {
            OpeningKind::Window => self.window,
            OpeningKind::Door => self.door,
        }
    }
}

impl Default for OpeningCatalog {
    fn default() -> Self {
        Self {
            window: OpeningSize {
                width: 1.5,
                height: 1.2,
                depth: 0.5,
            },
            door: OpeningSize {
                width: 1.0,
                height: 2.1,
                depth: 0.5,
            },
        }
    }
}

/// Manipulation mode of the transform gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Active interaction mode of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Translate,
    Rotate,
    Scale,
    Select,
    AddWall,
    AddWindow,
    AddDoor,
}

impl EditorMode {
    pub fn all() -> &'static [EditorMode] {
        &[
            EditorMode::Translate,
            EditorMode::Rotate,
            EditorMode::Scale,
            EditorMode::Select,
            EditorMode::AddWall,
            EditorMode::AddWindow,
            EditorMode::AddDoor,
        ]
    }

    /// Gizmo mode for the manipulation modes, `None` otherwise
    pub fn gizmo_mode(&self) -> Option<GizmoMode> {
        match self {
            EditorMode::Translate => Some(GizmoMode::Translate),
            EditorMode::Rotate => Some(GizmoMode::Rotate),
            EditorMode::Scale => Some(GizmoMode::Scale),
            _ => None,
        }
    }

    /// Opening carved by a click in this mode
    pub fn opening_kind(&self) -> Option<OpeningKind> {
        match self {
            EditorMode::AddWindow => Some(OpeningKind::Window),
            EditorMode::AddDoor => Some(OpeningKind::Door),
            _ => None,
        }
    }

    /// Placement modes draw a crosshair cursor over the viewport
    pub fn is_placement(&self) -> bool {
        matches!(
            self,
            EditorMode::AddWall | EditorMode::AddWindow | EditorMode::AddDoor
        )
    }
}

/// 8-bit sRGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([0xff, 0xff, 0xff]);
    pub const BLACK: Rgb = Rgb([0x00, 0x00, 0x00]);

    /// Parse `#rrggbb`, `rrggbb` or `0xrrggbb`
    pub fn from_hex(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid color '{input}', expected #rrggbb"));
        }

        let value = u32::from_str_radix(digits, 16).map_err(|e| e.to_string())?;
        Ok(Rgb([
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ]))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// Components scaled to 0.0..=1.0
    pub fn to_f32(&self) -> [f32; 3] {
        [
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
        ]
    }

    pub fn from_f32(c: [f32; 3]) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([to_u8(c[0]), to_u8(c[1]), to_u8(c[2])])
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One entry of the wall color palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub label: String,
    pub color: Rgb,
}

impl ColorSwatch {
    pub fn new(label: &str, hex: &str) -> Self {
        Self {
            label: label.to_string(),
            color: Rgb::from_hex(hex).unwrap_or(Rgb::WHITE),
        }
    }
}

/// Default wall color palette
pub fn default_swatches() -> Vec<ColorSwatch> {
    vec![
        ColorSwatch::new("Light gray", "#d9d9d9"),
        ColorSwatch::new("Cream", "#f5f0e6"),
        ColorSwatch::new("Sand", "#e3c9a8"),
        ColorSwatch::new("Sage", "#9fb8a0"),
        ColorSwatch::new("Sky", "#c8d6e5"),
        ColorSwatch::new("Slate", "#6b7b8c"),
    ]
}

/// A furniture model offered in the controls panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub label: String,
    /// Path of the glTF asset (`.gltf` or `.glb`)
    pub path: String,
}

impl FurnitureItem {
    pub fn new(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// Default furniture catalog
pub fn default_furniture() -> Vec<FurnitureItem> {
    vec![
        FurnitureItem::new("Sofa", "models/sofa.glb"),
        FurnitureItem::new("Chair", "models/chair.glb"),
        FurnitureItem::new("Table", "models/table.glb"),
        FurnitureItem::new("Bed", "models/bed.glb"),
        FurnitureItem::new("Lamp", "models/lamp.glb"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
        val: &T,
    ) {
        let json = serde_json::to_string(val).unwrap();
        let back: T = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, val);
    }

    // --- RoomDimensions ---

    // --- OpeningKind ---

    #[test]
    fn test_opening_kind_from_name() {
        assert_eq!(OpeningKind::from_name("window"), Some(OpeningKind::Window));
        assert_eq!(OpeningKind::from_name(" Door "), Some(OpeningKind::Door));
        assert_eq!(OpeningKind::from_name("skylight"), None);
        assert_eq!(OpeningKind::from_name(""), None);
    }

    #[test]
    fn test_opening_catalog_defaults() {
        let catalog = OpeningCatalog::default();
        let window = catalog.size(OpeningKind::Window);
        assert_eq!((window.width, window.height, window.depth), (1.5, 1.2, 0.5));
        let door = catalog.size(OpeningKind::Door);
        assert_eq!((door.width, door.height, door.depth), (1.0, 2.1, 0.5));
    }

    // --- EditorMode ---

    #[test]
    fn test_mode_gizmo_mapping() {
        assert_eq!(EditorMode::Translate.gizmo_mode(), Some(GizmoMode::Translate));
        assert_eq!(EditorMode::Rotate.gizmo_mode(), Some(GizmoMode::Rotate));
        assert_eq!(EditorMode::Scale.gizmo_mode(), Some(GizmoMode::Scale));
        assert_eq!(EditorMode::Select.gizmo_mode(), None);
        assert_eq!(EditorMode::AddWall.gizmo_mode(), None);
    }

    #[test]
    fn test_mode_placement() {
        assert!(EditorMode::AddWall.is_placement());
        assert!(EditorMode::AddDoor.is_placement());
        assert!(!EditorMode::Select.is_placement());
        assert!(!EditorMode::Translate.is_placement());
        assert_eq!(EditorMode::AddWindow.opening_kind(), Some(OpeningKind::Window));
        assert_eq!(EditorMode::AddWall.opening_kind(), None);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&EditorMode::AddWall).unwrap();
        assert_eq!(json, r#""add_wall""#);
        roundtrip(&EditorMode::AddDoor);
    }

    // --- Rgb ---

    #[test]
    fn test_rgb_from_hex_variants() {
        assert_eq!(Rgb::from_hex("#d9d9d9").unwrap(), Rgb([0xd9, 0xd9, 0xd9]));
        assert_eq!(Rgb::from_hex("0xff8000").unwrap(), Rgb([0xff, 0x80, 0x00]));
        assert_eq!(Rgb::from_hex("00ff00").unwrap(), Rgb([0, 0xff, 0]));
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
    }

    #[test]
    fn test_rgb_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb([0x12, 0x34, 0x56])).unwrap();
        assert_eq!(json, r##""#123456""##);
        roundtrip(&Rgb([1, 2, 3]));
        assert!(serde_json::from_str::<Rgb>(r#""nope""#).is_err());
    }

    #[test]
    fn test_rgb_f32_conversion() {
        let c = Rgb::WHITE.to_f32();
        assert_eq!(c, [1.0, 1.0, 1.0]);
        assert_eq!(Rgb::from_f32([0.0, 0.5, 1.0]), Rgb([0, 128, 255]));
    }

    // --- Catalogs ---

    #[test]
    fn test_default_palettes_parse() {
        let swatches = default_swatches();
        assert!(!swatches.is_empty());
        assert_eq!(swatches[0].color, Rgb([0xd9, 0xd9, 0xd9]));
        for item in default_furniture() {
            assert!(item.path.ends_with(".glb"));
        }
    }
}
