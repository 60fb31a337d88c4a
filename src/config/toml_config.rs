use crate::core::batch::BatchPolicy;
use crate::core::qr::{
    QrStyle, DEFAULT_DARK_COLOR, DEFAULT_LIGHT_COLOR, DEFAULT_QR_SIZE, DEFAULT_QUIET_ZONE,
};
use crate::domain::model::TemplateType;
use crate::utils::error::{Result, ZaloError};
use crate::utils::validation::{
    validate_hex_color, validate_non_empty_string, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_CLIPBOARD_HOLD_SECS: u64 = 15;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

/// 設定檔，每個區段都可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    pub link: LinkSection,
    pub zns: ZnsSection,
    pub sticker: StickerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSection {
    pub qr_color: String,
    pub bg_color: String,
    pub qr_size: u32,
    pub quiet_zone: u32,
    pub output_path: String,
    /// `--copy` 時保留剪貼簿內容的秒數（Linux），0 表示不等待
    pub clipboard_hold_secs: u64,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            qr_color: DEFAULT_DARK_COLOR.to_string(),
            bg_color: DEFAULT_LIGHT_COLOR.to_string(),
            qr_size: DEFAULT_QR_SIZE,
            quiet_zone: DEFAULT_QUIET_ZONE,
            output_path: "./output".to_string(),
            clipboard_hold_secs: DEFAULT_CLIPBOARD_HOLD_SECS,
        }
    }
}

impl LinkSection {
    pub fn qr_style(&self) -> QrStyle {
        QrStyle {
            dark_color: self.qr_color.clone(),
            light_color: self.bg_color.clone(),
            size: self.qr_size,
            quiet_zone: self.quiet_zone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZnsSection {
    pub business_name: String,
    pub button_text: String,
    pub template_type: TemplateType,
    pub image_url: Option<String>,
}

impl Default for ZnsSection {
    fn default() -> Self {
        Self {
            business_name: "Doanh nghiệp ABC".to_string(),
            button_text: "Theo dõi đơn hàng".to_string(),
            template_type: TemplateType::Text,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerSection {
    pub output_path: String,
    pub batch_policy: BatchPolicy,
}

impl Default for StickerSection {
    fn default() -> Self {
        Self {
            output_path: "./stickers".to_string(),
            batch_policy: BatchPolicy::Isolate,
        }
    }
}

impl ToolkitConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ZaloError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ZaloError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ZALO_OUTPUT})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_hex_color("link.qr_color", &self.link.qr_color)?;
        validate_hex_color("link.bg_color", &self.link.bg_color)?;
        validate_range("link.qr_size", self.link.qr_size, 64, 4096)?;
        validate_range("link.quiet_zone", self.link.quiet_zone, 0, 16)?;
        validate_path("link.output_path", &self.link.output_path)?;
        validate_range(
            "link.clipboard_hold_secs",
            self.link.clipboard_hold_secs,
            0,
            600,
        )?;
        validate_path("sticker.output_path", &self.sticker.output_path)?;
        validate_non_empty_string("zns.business_name", &self.zns.business_name)?;

        if let Some(url) = &self.zns.image_url {
            crate::utils::validation::validate_url("zns.image_url", url)?;
        }

        Ok(())
    }
}

impl Validate for ToolkitConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
