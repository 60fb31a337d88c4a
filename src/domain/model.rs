use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 聊天連結產生器的輸入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLinkRequest {
    pub raw_phone_number: String,
    pub message: String,
}

/// 只含數字、以國碼 84 開頭的電話號碼
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPhone(pub(crate) String);

impl NormalizedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink(pub(crate) String);

impl DeepLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDocument {
    pub body: String,
    pub variables: Vec<TemplateVariable>,
}

/// ZNS 範本類型，決定預覽中是否出現圖片區塊或按鈕
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TemplateType {
    #[default]
    Text,
    ImageText,
    Button,
}

#[derive(Debug, Clone)]
pub struct SourceImage {
    pub id: Uuid,
    pub name: String,
    pub media_type: String,
    pub original_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSticker {
    pub id: Uuid,
    pub source_id: Uuid,
    pub original_name: String,
    pub fixed_width: u32,
    pub fixed_height: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub encoded_png: Vec<u8>,
}

/// 下載動作產生的單一檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
