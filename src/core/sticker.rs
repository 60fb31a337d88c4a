use crate::domain::model::{ProcessedSticker, SourceImage};
use crate::utils::error::{Result, ZaloError};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use uuid::Uuid;

/// Zalo 貼圖固定邊長
pub const STICKER_SIZE: u32 = 360;

static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^/.]+$").expect("extension pattern"));

/// 等比縮放並置中於正方形畫布
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f64,
    pub scaled_width: f64,
    pub scaled_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Letterbox {
    pub fn fit(width: u32, height: u32) -> Self {
        let size = STICKER_SIZE as f64;
        let (w, h) = (width as f64, height as f64);
        let scale = (size / w).min(size / h);
        let scaled_width = w * scale;
        let scaled_height = h * scale;

        Self {
            scale,
            scaled_width,
            scaled_height,
            offset_x: (size - scaled_width) / 2.0,
            offset_y: (size - scaled_height) / 2.0,
        }
    }

    /// 實際繪製的像素區域 `(x, y, width, height)`
    pub fn pixel_rect(&self) -> (u32, u32, u32, u32) {
        let width = (self.scaled_width.round() as u32).clamp(1, STICKER_SIZE);
        let height = (self.scaled_height.round() as u32).clamp(1, STICKER_SIZE);
        (
            (STICKER_SIZE - width) / 2,
            (STICKER_SIZE - height) / 2,
            width,
            height,
        )
    }
}

/// 依副檔名推斷宣告的媒體類型
pub fn media_type_for(path: &str) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// 去掉路徑與最後一個副檔名
pub fn file_stem(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(original_name);
    EXTENSION.replace(base, "").into_owned()
}

pub fn sticker_file_name(original_name: &str) -> String {
    format!("sticker-{}.png", file_stem(original_name))
}

pub fn decode_source(
    name: &str,
    media_type: &str,
    bytes: Vec<u8>,
) -> Result<(SourceImage, DynamicImage)> {
    let decoded = image::load_from_memory(&bytes).map_err(|source| ZaloError::DecodeError {
        file: name.to_string(),
        source,
    })?;

    let source = SourceImage {
        id: Uuid::new_v4(),
        name: name.to_string(),
        media_type: media_type.to_string(),
        width: decoded.width(),
        height: decoded.height(),
        original_bytes: bytes,
    };
    Ok((source, decoded))
}

fn acquire_surface(source: &SourceImage) -> Result<RgbaImage> {
    if source.width == 0 || source.height == 0 {
        return Err(ZaloError::SurfaceError {
            message: format!(
                "'{}' has an empty size {}x{}",
                source.name, source.width, source.height
            ),
        });
    }
    // 全透明
    Ok(RgbaImage::new(STICKER_SIZE, STICKER_SIZE))
}

pub fn render_sticker(source: &SourceImage, decoded: &DynamicImage) -> Result<ProcessedSticker> {
    let mut canvas = acquire_surface(source)?;

    let layout = Letterbox::fit(source.width, source.height);
    let (x, y, width, height) = layout.pixel_rect();
    let scaled = imageops::resize(decoded, width, height, FilterType::Lanczos3);
    imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);

    let mut encoded_png = Vec::new();
    PngEncoder::new(&mut encoded_png)
        .write_image(
            canvas.as_raw(),
            STICKER_SIZE,
            STICKER_SIZE,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ZaloError::SurfaceError {
            message: format!("PNG encoding failed for '{}': {}", source.name, e),
        })?;

    tracing::debug!(
        "🖼️ {} {}x{} -> scale {:.4}, drawn {}x{} at ({}, {})",
        source.name,
        source.width,
        source.height,
        layout.scale,
        width,
        height,
        x,
        y
    );

    Ok(ProcessedSticker {
        id: Uuid::new_v4(),
        source_id: source.id,
        original_name: source.name.clone(),
        fixed_width: STICKER_SIZE,
        fixed_height: STICKER_SIZE,
        source_width: source.width,
        source_height: source.height,
        encoded_png,
    })
}

/// 解碼並轉成 360x360 透明背景 PNG
pub fn process_image(name: &str, media_type: &str, bytes: Vec<u8>) -> Result<ProcessedSticker> {
    let (source, decoded) = decode_source(name, media_type, bytes)?;
    render_sticker(&source, &decoded)
}
