//! Product image decoding and the per-URL texture cache.

use std::collections::HashMap;

use eframe::egui;

#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| format!("decode failed: {err}"))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PreviewImage {
        size: [width as usize, height as usize],
        rgba: rgba.into_raw(),
    })
}

pub enum ImageSlot {
    Pending,
    Ready(egui::TextureHandle),
    Failed(String),
}

#[derive(Default)]
pub struct ImageCache {
    slots: HashMap<String, ImageSlot>,
}

impl ImageCache {
    /// Returns `true` when `url` has not been requested before and should be fetched now.
    pub fn begin(&mut self, url: &str) -> bool {
        if url.is_empty() || self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(url.to_string(), ImageSlot::Pending);
        true
    }

    pub fn needs_fetch(&self, url: &str) -> bool {
        !url.is_empty() && !self.slots.contains_key(url)
    }

    pub fn store(&mut self, ctx: &egui::Context, url: String, image: PreviewImage) {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.rgba);
        let texture = ctx.load_texture(url.clone(), color_image, egui::TextureOptions::LINEAR);
        self.slots.insert(url, ImageSlot::Ready(texture));
    }

    pub fn fail(&mut self, url: String, reason: String) {
        self.slots.insert(url, ImageSlot::Failed(reason));
    }

    pub fn slot(&self, url: &str) -> Option<&ImageSlot> {
        self.slots.get(url)
    }
}
