use crate::error::DexError;
use crate::fetch::PokeApi;
use futures::future::{BoxFuture, FutureExt};
use image::imageops::FilterType;
use image::RgbaImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Decoded artwork kept in memory so the views can rescale it per frame.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DexError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self {
            image: img.to_rgba8(),
        })
    }

    /// Download and decode the image at `url`.
    pub async fn fetch(api: &PokeApi, url: &str) -> Result<Self, DexError> {
        let bytes = api.image_bytes(url).await?;
        Self::from_bytes(&bytes)
    }

    /// Pixel rows resized to `w` x `h`. Transparent pixels come back as `None`
    /// so the renderer can leave those cells blank.
    pub fn pixel_rows(&self, w: u32, h: u32) -> Vec<Vec<Option<(u8, u8, u8)>>> {
        let resized = image::imageops::resize(&self.image, w.max(1), h.max(1), FilterType::Triangle);
        let mut rows = Vec::with_capacity(resized.height() as usize);
        for y in 0..resized.height() {
            let mut row = Vec::with_capacity(resized.width() as usize);
            for x in 0..resized.width() {
                let p = resized.get_pixel(x, y);
                if p[3] < 128 {
                    row.push(None);
                } else {
                    row.push(Some((p[0], p[1], p[2])));
                }
            }
            rows.push(row);
        }
        rows
    }
}

#[derive(Debug, Clone)]
pub enum SpriteEntry {
    Loading,
    Ready(Arc<Sprite>),
    Failed,
}

/// In-memory sprite cache keyed by image URL. Each URL is downloaded once unless
/// a failed download is explicitly retried.
#[derive(Clone)]
pub struct SpriteCache {
    api: PokeApi,
    entries: Arc<Mutex<HashMap<String, SpriteEntry>>>,
}

impl SpriteCache {
    pub fn new(api: PokeApi) -> Self {
        Self {
            api,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, url: &str) -> Option<SpriteEntry> {
        self.entries.lock().get(url).cloned()
    }

    /// Mark `url` as loading and return the download future, or `None` when the
    /// URL is empty or already requested.
    pub fn request(&self, url: &str) -> Option<BoxFuture<'static, ()>> {
        if url.is_empty() {
            return None;
        }
        {
            let mut entries = self.entries.lock();
            if entries.contains_key(url) {
                return None;
            }
            entries.insert(url.to_string(), SpriteEntry::Loading);
        }

        let api = self.api.clone();
        let entries = self.entries.clone();
        let url = url.to_string();
        Some(
            async move {
                let entry = match Sprite::fetch(&api, &url).await {
                    Ok(sprite) => SpriteEntry::Ready(Arc::new(sprite)),
                    Err(err) => {
                        log::warn!("sprite {} unavailable: {}", url, err);
                        SpriteEntry::Failed
                    }
                };
                entries.lock().insert(url, entry);
            }
            .boxed(),
        )
    }

    /// Forget a failed download of `url` and request it again.
    pub fn retry(&self, url: &str) -> Option<BoxFuture<'static, ()>> {
        {
            let mut entries = self.entries.lock();
            if matches!(entries.get(url), Some(SpriteEntry::Failed)) {
                log::debug!("retrying sprite {}", url);
                entries.remove(url);
            }
        }
        self.request(url)
    }
}
