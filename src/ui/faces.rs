use anyhow::Context;
use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const FACE_SIZE: u32 = 144;
const SHEET_COLUMNS: u32 = 4;

/// Cut one face out of a face sheet: 4 columns by 2 rows of 144px cells.
pub fn load_face(path: &Path, index: u32) -> anyhow::Result<egui::ColorImage> {
    let sheet = image::open(path).with_context(|| format!("opening face sheet {}", path.display()))?;

    let x = (index % SHEET_COLUMNS) * FACE_SIZE;
    let y = (index / SHEET_COLUMNS) * FACE_SIZE;
    if x + FACE_SIZE > sheet.width() || y + FACE_SIZE > sheet.height() {
        anyhow::bail!("face {index} is outside {}", path.display());
    }

    let face = sheet.crop_imm(x, y, FACE_SIZE, FACE_SIZE).to_rgba8();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [FACE_SIZE as usize, FACE_SIZE as usize],
        face.as_raw(),
    ))
}

/// Loaded face textures, keyed by sheet name and index. Failed loads are
/// remembered so a missing file is only reported once.
#[derive(Default)]
pub struct FaceCache {
    textures: HashMap<(String, u32), Option<egui::TextureHandle>>,
}

impl FaceCache {
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn get(
        &mut self,
        ctx: &egui::Context,
        faces_dir: Option<&PathBuf>,
        name: &str,
        index: u32,
    ) -> Option<egui::TextureHandle> {
        if name.is_empty() {
            return None;
        }
        let dir = faces_dir?;

        self.textures
            .entry((name.to_string(), index))
            .or_insert_with(|| {
                let path = dir.join(format!("{name}.png"));
                match load_face(&path, index) {
                    Ok(image) => Some(ctx.load_texture(
                        format!("face:{name}:{index}"),
                        image,
                        egui::TextureOptions::default(),
                    )),
                    Err(e) => {
                        log::warn!("{e:#}");
                        None
                    }
                }
            })
            .clone()
    }
}
