use crate::core::sticker::{file_stem, sticker_file_name};
use crate::domain::model::{DownloadArtifact, ProcessedSticker};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::io::Write;
use uuid::Uuid;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "zalo-stickers.zip";
pub const ARCHIVE_FOLDER: &str = "zalo-stickers";

/// 目前已處理的貼圖
#[derive(Debug, Clone, Default)]
pub struct StickerCollection {
    items: Vec<ProcessedSticker>,
}

impl StickerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, stickers: Vec<ProcessedSticker>) {
        self.items.extend(stickers);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ProcessedSticker> {
        let index = self.items.iter().position(|s| s.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear_all(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessedSticker> {
        self.items.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&ProcessedSticker> {
        self.items.iter().find(|s| s.id == id)
    }

    /// 一張貼圖時直接輸出 PNG，多張時打包成 ZIP
    pub fn download_all(&self) -> Result<Option<DownloadArtifact>> {
        match self.items.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(download_single(single))),
            many => Ok(Some(package_archive(many)?)),
        }
    }

    /// 每張貼圖各自一個 PNG；檔名重複時全部改用編號
    pub fn download_each(&self) -> Vec<DownloadArtifact> {
        let names: Vec<String> = self
            .items
            .iter()
            .map(|s| sticker_file_name(&s.original_name))
            .collect();
        let distinct = names.iter().collect::<HashSet<_>>().len() == names.len();
        if !distinct {
            tracing::debug!("Duplicate sticker names, numbering output files");
        }

        self.items
            .iter()
            .zip(names)
            .enumerate()
            .map(|(index, (sticker, name))| DownloadArtifact {
                file_name: if distinct {
                    name
                } else {
                    numbered_file_name(index, &sticker.original_name)
                },
                bytes: sticker.encoded_png.clone(),
            })
            .collect()
    }
}

pub fn download_single(sticker: &ProcessedSticker) -> DownloadArtifact {
    DownloadArtifact {
        file_name: sticker_file_name(&sticker.original_name),
        bytes: sticker.encoded_png.clone(),
    }
}

pub fn numbered_file_name(index: usize, original_name: &str) -> String {
    format!("sticker-{}-{}.png", index + 1, file_stem(original_name))
}

pub fn archive_entry_name(index: usize, original_name: &str) -> String {
    format!("{}/{}", ARCHIVE_FOLDER, numbered_file_name(index, original_name))
}

pub fn package_archive(stickers: &[ProcessedSticker]) -> Result<DownloadArtifact> {
    tracing::debug!("Creating ZIP file with {} stickers", stickers.len());

    let bytes = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (index, sticker) in stickers.iter().enumerate() {
            let name = archive_entry_name(index, &sticker.original_name);
            zip.start_file::<_, ()>(name, FileOptions::default())?;
            zip.write_all(&sticker.encoded_png)?;
        }

        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    tracing::debug!("ZIP archive ready ({} bytes)", bytes.len());
    Ok(DownloadArtifact {
        file_name: ARCHIVE_NAME.to_string(),
        bytes,
    })
}
