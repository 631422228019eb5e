use crate::upload::FileHandle;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use tracing::{debug, warn};

/// Holds the preview resource for at most one file. Switching files or
/// releasing drops the previous resource.
#[derive(Debug)]
pub struct PreviewSlot<T> {
    current: Option<(String, Option<T>)>,
}

impl<T> Default for PreviewSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> PreviewSlot<T> {
    /// A failed acquisition is remembered so it is not retried every frame.
    pub fn get_or_acquire<F>(&mut self, id: &str, acquire: F) -> Option<&T>
    where
        F: FnOnce() -> Option<T>,
    {
        let held = matches!(&self.current, Some((held_id, _)) if held_id == id);
        if !held {
            self.release();
            self.current = Some((id.to_string(), acquire()));
        }
        self.current.as_ref().and_then(|(_, resource)| resource.as_ref())
    }

    pub fn release(&mut self) {
        if let Some((id, _)) = self.current.take() {
            debug!(%id, "Released preview");
        }
    }

    #[cfg(test)]
    pub fn held_id(&self) -> Option<&str> {
        self.current.as_ref().map(|(id, _)| id.as_str())
    }
}

pub fn load_texture(ctx: &egui::Context, file: &FileHandle) -> Option<TextureHandle> {
    if !file.is_image() {
        return None;
    }
    match image::load_from_memory(&file.bytes[..]) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            Some(ctx.load_texture(format!("preview:{}", file.name), pixels, TextureOptions::LINEAR))
        }
        Err(e) => {
            warn!(name = %file.name, error = %e, "Could not decode image preview");
            None
        }
    }
}
