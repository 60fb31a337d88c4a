use crate::domain::model::{DeepLink, NormalizedPhone};
use crate::utils::error::{Result, ZaloError};
use crate::utils::validation::{validate_hex_color, validate_range, Validate};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageBuffer, ImageEncoder, Rgba, RgbaImage};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DARK_COLOR: &str = "#0068FF";
pub const DEFAULT_LIGHT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_QR_SIZE: u32 = 200;
pub const DEFAULT_QUIET_ZONE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum QrFormat {
    Png,
    Svg,
}

impl QrFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            QrFormat::Png => "png",
            QrFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrStyle {
    pub dark_color: String,
    pub light_color: String,
    /// PNG 邊長（像素）
    pub size: u32,
    /// 四周留白的模組數
    pub quiet_zone: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            dark_color: DEFAULT_DARK_COLOR.to_string(),
            light_color: DEFAULT_LIGHT_COLOR.to_string(),
            size: DEFAULT_QR_SIZE,
            quiet_zone: DEFAULT_QUIET_ZONE,
        }
    }
}

impl Validate for QrStyle {
    fn validate(&self) -> Result<()> {
        validate_hex_color("link.qr_color", &self.dark_color)?;
        validate_hex_color("link.bg_color", &self.light_color)?;
        validate_range("link.qr_size", self.size, 64, 4096)?;
        validate_range("link.quiet_zone", self.quiet_zone, 0, 16)?;
        Ok(())
    }
}

fn parse_hex_color(field: &str, value: &str) -> Result<Rgba<u8>> {
    validate_hex_color(field, value)?;
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&value[range], 16).map_err(|e| ZaloError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    };
    Ok(Rgba([channel(1..3)?, channel(3..5)?, channel(5..7)?, 255]))
}

fn encode(link: &DeepLink) -> Result<QrCode> {
    // 與網頁版相同使用 H 級容錯
    Ok(QrCode::with_error_correction_level(
        link.as_str().as_bytes(),
        EcLevel::H,
    )?)
}

/// 產生 PNG 格式的 QR code
pub fn render_png(link: &DeepLink, style: &QrStyle) -> Result<Vec<u8>> {
    let code = encode(link)?;
    let dark = parse_hex_color("link.qr_color", &style.dark_color)?;
    let light = parse_hex_color("link.bg_color", &style.light_color)?;

    let modules = code.width() as u32;
    let border = style.quiet_zone;
    let span = modules + 2 * border;
    // 輸出邊長固定為 size；模組太多時退為每格 1px
    let img_size = style.size.max(span);

    let module_at = |coord: u32| -> Option<usize> {
        let module = coord * span / img_size;
        (border..border + modules)
            .contains(&module)
            .then(|| (module - border) as usize)
    };

    let img: RgbaImage = ImageBuffer::from_fn(img_size, img_size, |px, py| {
        match (module_at(px), module_at(py)) {
            (Some(x), Some(y)) if code[(x, y)] == qrcode::Color::Dark => dark,
            _ => light,
        }
    });

    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes)
        .write_image(img.as_raw(), img_size, img_size, ExtendedColorType::Rgba8)
        .map_err(|e| ZaloError::SurfaceError {
            message: format!("PNG encoding failed: {}", e),
        })?;

    tracing::debug!(
        "🔳 QR rendered: {} modules, {}x{}px",
        modules,
        img_size,
        img_size
    );
    Ok(png_bytes)
}

pub fn render_svg(link: &DeepLink, style: &QrStyle) -> Result<String> {
    let code = encode(link)?;
    validate_hex_color("link.qr_color", &style.dark_color)?;
    validate_hex_color("link.bg_color", &style.light_color)?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(style.size, style.size)
        .quiet_zone(style.quiet_zone > 0)
        .dark_color(svg::Color(&style.dark_color))
        .light_color(svg::Color(&style.light_color))
        .build())
}

pub fn qr_file_name(phone: &NormalizedPhone, format: QrFormat) -> String {
    format!("zalo-qr-{}.{}", phone, format.extension())
}
