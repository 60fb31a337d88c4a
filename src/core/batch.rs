use crate::core::sticker::{is_image_media_type, media_type_for, process_image};
use crate::domain::model::ProcessedSticker;
use crate::utils::error::{Result, ZaloError};
use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};

/// 一批中有圖片失敗時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BatchPolicy {
    /// 失敗的檔案記錄後略過，其他照常輸出
    #[default]
    Isolate,
    /// 任何一張失敗，整批都不輸出
    FailFast,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// 媒體類型由副檔名推斷
    pub fn from_path_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = media_type_for(&name);
        Self {
            name,
            media_type,
            bytes,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedSticker>,
    pub failures: Vec<(String, ZaloError)>,
    pub skipped: Vec<String>,
}

async fn spawn_one(file: SourceFile) -> Result<ProcessedSticker> {
    let name = file.name.clone();
    tokio::task::spawn_blocking(move || process_image(&file.name, &file.media_type, file.bytes))
        .await
        .map_err(|e| ZaloError::ProcessingError {
            message: format!("Worker for '{}' stopped: {}", name, e),
        })?
}

/// 同時處理一批圖片，全部完成後才回傳。
///
/// 非圖片的檔案直接略過，不算錯誤。
pub async fn process_batch(files: Vec<SourceFile>, policy: BatchPolicy) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut accepted = Vec::new();

    for file in files {
        if is_image_media_type(&file.media_type) {
            accepted.push(file);
        } else {
            tracing::debug!("⏭️ Skipping non-image file {} ({})", file.name, file.media_type);
            report.skipped.push(file.name);
        }
    }

    tracing::info!(
        "🖼️ Processing {} image(s), skipped {} ({:?})",
        accepted.len(),
        report.skipped.len(),
        policy
    );

    match policy {
        BatchPolicy::FailFast => {
            report.processed = try_join_all(accepted.into_iter().map(spawn_one))
                .await
                .inspect_err(|e| tracing::error!("❌ Batch aborted: {}", e))?;
        }
        BatchPolicy::Isolate => {
            let names: Vec<String> = accepted.iter().map(|f| f.name.clone()).collect();
            let results = join_all(accepted.into_iter().map(spawn_one)).await;

            for (name, result) in names.into_iter().zip(results) {
                match result {
                    Ok(sticker) => report.processed.push(sticker),
                    Err(e) => {
                        tracing::warn!("⚠️ {} excluded: {}", name, e);
                        report.failures.push((name, e));
                    }
                }
            }
        }
    }

    Ok(report)
}
