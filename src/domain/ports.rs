use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 系統剪貼簿
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// 每個工具分三個階段：收集輸入、轉換、輸出
#[async_trait]
pub trait Tool: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn name(&self) -> &'static str;
    async fn gather(&self) -> Result<Self::Input>;
    async fn transform(&self, input: Self::Input) -> Result<Self::Output>;
    /// 回傳寫出的檔案路徑
    async fn export(&self, output: Self::Output) -> Result<Vec<String>>;
}
