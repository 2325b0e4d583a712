use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use shared::EditorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Id,
}

impl Lang {
    pub fn all() -> [Lang; 2] {
        [Lang::En, Lang::Id]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Id => "Bahasa Indonesia",
        }
    }
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Id,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Id => 1,
        },
        Ordering::Relaxed,
    );
}

/// Label for a mode button
pub fn mode_label(mode: EditorMode) -> &'static str {
    match mode {
        EditorMode::Translate => t("mode.translate"),
        EditorMode::Rotate => t("mode.rotate"),
        EditorMode::Scale => t("mode.scale"),
        EditorMode::Select => t("mode.select"),
        EditorMode::AddWall => t("mode.add_wall"),
        EditorMode::AddWindow => t("mode.add_window"),
        EditorMode::AddDoor => t("mode.add_door"),
    }
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let id = lang() == Lang::Id;
    match key {
        // ── Room ────────────────────────────────────────────
        "room.title" => if id { "Ruangan" } else { "Room" },
        "room.width" => if id { "Lebar" } else { "Width" },
        "room.depth" => if id { "Panjang" } else { "Depth" },
        "room.height" => if id { "Tinggi" } else { "Height" },
        "room.generate" => if id { "Buat Ruangan" } else { "Generate room" },
        "room.invalid" => if id { "Ukuran tidak valid" } else { "Invalid dimensions" },

        // ── Modes ───────────────────────────────────────────
        "mode.title" => if id { "Mode" } else { "Mode" },
        "mode.translate" => if id { "Geser (W)" } else { "Move (W)" },
        "mode.rotate" => if id { "Putar (E)" } else { "Rotate (E)" },
        "mode.scale" => if id { "Skala (R)" } else { "Scale (R)" },
        "mode.select" => if id { "Pilih (Q)" } else { "Select (Q)" },
        "mode.add_wall" => if id { "Tambah Dinding" } else { "Add wall" },
        "mode.add_window" => if id { "Tambah Jendela" } else { "Add window" },
        "mode.add_door" => if id { "Tambah Pintu" } else { "Add door" },

        // ── Hints ───────────────────────────────────────────
        "hint.add_wall_start" => if id { "Klik lantai untuk titik awal dinding" } else { "Click the floor to start the wall" },
        "hint.add_wall_end" => if id { "Klik lantai untuk titik akhir dinding" } else { "Click the floor to finish the wall" },
        "hint.add_window" => if id { "Klik dinding untuk memasang jendela" } else { "Click a wall to place a window" },
        "hint.add_door" => if id { "Klik dinding untuk memasang pintu" } else { "Click a wall to place a door" },
        "hint.select" => if id { "Klik objek untuk memilih" } else { "Click an object to select it" },
        "hint.gizmo" => if id { "Seret sumbu gizmo untuk mengubah objek" } else { "Drag a gizmo axis to edit the object" },

        // ── Furniture ───────────────────────────────────────
        "furniture.title" => if id { "Furnitur" } else { "Furniture" },
        "furniture.open" => if id { "Buka model..." } else { "Open model..." },
        "furniture.open_title" => if id { "Buka model glTF" } else { "Open glTF model" },
        "furniture.loading" => if id { "Memuat..." } else { "Loading..." },
        "furniture.failed" => if id { "Gagal memuat model" } else { "Failed to load model" },
        "status.dismiss" => if id { "Tutup" } else { "Dismiss" },

        // ── Walls ───────────────────────────────────────────
        "wall.color" => if id { "Warna Dinding" } else { "Wall color" },
        "wall.custom" => if id { "Warna lain" } else { "Custom" },

        // ── Properties ──────────────────────────────────────
        "props.title" => if id { "Properti" } else { "Properties" },
        "props.none" => if id { "Tidak ada objek terpilih" } else { "Nothing selected" },
        "props.name" => if id { "Nama" } else { "Name" },
        "props.kind" => if id { "Jenis" } else { "Kind" },
        "props.position" => if id { "Posisi" } else { "Position" },
        "props.rotation" => if id { "Rotasi" } else { "Rotation" },
        "props.scale" => if id { "Skala" } else { "Scale" },
        "props.deselect" => if id { "Lepas pilihan" } else { "Deselect" },

        // ── Menu ────────────────────────────────────────────
        "menu.file" => if id { "Berkas" } else { "File" },
        "menu.save_settings" => if id { "Simpan pengaturan" } else { "Save settings" },
        "menu.quit" => if id { "Keluar" } else { "Quit" },
        "menu.view" => if id { "Tampilan" } else { "View" },
        "menu.properties" => if id { "Panel properti" } else { "Properties panel" },

        // ── Status bar ──────────────────────────────────────
        "status.walls" => if id { "Dinding" } else { "Walls" },
        "status.models" => if id { "Model" } else { "Models" },
        "status.room" => if id { "Ruangan" } else { "Room" },
        "status.selected" => if id { "Terpilih" } else { "Selected" },
        "status.mode" => if id { "Mode" } else { "Mode" },

        // ── View ────────────────────────────────────────────
        "view.title" => if id { "Tampilan" } else { "View" },
        "view.grid" => if id { "Grid" } else { "Grid" },
        "view.shadows" => if id { "Bayangan" } else { "Shadows" },
        "view.language" => if id { "Bahasa" } else { "Language" },
        "view.reset_camera" => if id { "Reset kamera" } else { "Reset camera" },
        "view.font_size" => if id { "Ukuran huruf" } else { "Font size" },

        _ => "???",
    }
}
