use crate::core::batch::{process_batch, BatchPolicy, BatchReport, SourceFile};
use crate::core::collection::StickerCollection;
use crate::core::{DownloadArtifact, Storage, Tool};
use crate::utils::error::Result;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct StickerSettings {
    pub inputs: Vec<String>,
    pub output_path: String,
    pub policy: BatchPolicy,
    /// 每張貼圖各自輸出 PNG，不打包
    pub separate: bool,
}

pub struct StickerTool<S: Storage> {
    settings: StickerSettings,
    input: S,
    output: S,
    collection: Mutex<StickerCollection>,
}

impl<S: Storage> StickerTool<S> {
    pub fn new(settings: StickerSettings, input: S, output: S) -> Self {
        Self {
            settings,
            input,
            output,
            collection: Mutex::new(StickerCollection::new()),
        }
    }

    pub fn collection(&self) -> MutexGuard<'_, StickerCollection> {
        self.collection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn artifacts(&self) -> Result<Vec<DownloadArtifact>> {
        let collection = self.collection();
        if self.settings.separate {
            Ok(collection.download_each())
        } else {
            Ok(collection.download_all()?.into_iter().collect())
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Tool for StickerTool<S> {
    type Input = Vec<SourceFile>;
    type Output = BatchReport;

    fn name(&self) -> &'static str {
        "sticker maker"
    }

    async fn gather(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::with_capacity(self.settings.inputs.len());

        for path in &self.settings.inputs {
            match self.input.read_file(path).await {
                Ok(bytes) => files.push(SourceFile::from_path_bytes(path.clone(), bytes)),
                Err(e) if self.settings.policy == BatchPolicy::Isolate => {
                    tracing::warn!("⚠️ Failed to read {}: {}", path, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(files)
    }

    async fn transform(&self, files: Vec<SourceFile>) -> Result<BatchReport> {
        let mut report = process_batch(files, self.settings.policy).await?;

        // 整批完成後才加入
        self.collection()
            .append(std::mem::take(&mut report.processed));
        Ok(report)
    }

    async fn export(&self, report: BatchReport) -> Result<Vec<String>> {
        if !report.failures.is_empty() {
            tracing::warn!("⚠️ {} image(s) could not be processed", report.failures.len());
        }

        let artifacts = self.artifacts()?;
        if artifacts.is_empty() {
            tracing::warn!("No stickers to save");
        }

        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            self.output
                .write_file(&artifact.file_name, &artifact.bytes)
                .await?;
            written.push(format!("{}/{}", self.settings.output_path, artifact.file_name));
        }
        Ok(written)
    }
}
