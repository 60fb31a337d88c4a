use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;
use tokio::fs;

/// 以 `base_path` 為根目錄的本機檔案存取，絕對路徑不受根目錄影響
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn resolve(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).to_string_lossy().into_owned()
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(full_path, data).await?;
        Ok(())
    }
}
