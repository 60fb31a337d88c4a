use crate::core::clipboard::{copy_link, CopyIndicator};
use crate::core::qr::{qr_file_name, render_png, render_svg, QrFormat, QrStyle};
use crate::core::{ChatLinkRequest, ClipboardSink, DeepLink, NormalizedPhone, Storage, Tool};
use crate::utils::error::Result;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// 每次複製時才建立剪貼簿，避免跨 await 持有。參數為保留剪貼簿內容的時間
pub type ClipboardFactory = fn(Duration) -> Result<Box<dyn ClipboardSink>>;

#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub request: ChatLinkRequest,
    pub style: QrStyle,
    pub formats: Vec<QrFormat>,
    pub output_path: String,
    pub copy: bool,
    /// 程式結束前持續提供剪貼簿內容的上限
    pub clipboard_hold: Duration,
}

#[derive(Debug, Clone)]
pub struct LinkOutput {
    pub phone: NormalizedPhone,
    pub link: DeepLink,
    pub png: Option<Vec<u8>>,
    pub svg: Option<String>,
}

pub struct LinkTool<S: Storage> {
    settings: LinkSettings,
    storage: S,
    clipboard: Option<ClipboardFactory>,
    indicator: Mutex<CopyIndicator>,
}

impl<S: Storage> LinkTool<S> {
    pub fn new(settings: LinkSettings, storage: S, clipboard: Option<ClipboardFactory>) -> Self {
        Self {
            settings,
            storage,
            clipboard,
            indicator: Mutex::new(CopyIndicator::default()),
        }
    }

    /// 「已複製」提示目前是否顯示
    pub fn copied(&self, now: Instant) -> bool {
        self.indicator
            .lock()
            .map(|indicator| indicator.is_active(now))
            .unwrap_or(false)
    }

    fn copy_to_clipboard(&self, link: &DeepLink) {
        let Some(factory) = self.clipboard else {
            return;
        };

        let result = factory(self.settings.clipboard_hold).and_then(|mut sink| {
            let mut indicator = self
                .indicator
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            copy_link(sink.as_mut(), Some(link), &mut indicator, Instant::now())
        });

        match result {
            Ok(_) => println!("📋 Copied!"),
            Err(e) => tracing::error!("❌ {} ({})", e.user_friendly_message(), e),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Tool for LinkTool<S> {
    type Input = ChatLinkRequest;
    type Output = Option<LinkOutput>;

    fn name(&self) -> &'static str {
        "link generator"
    }

    async fn gather(&self) -> Result<ChatLinkRequest> {
        tracing::debug!("Link request: {:?}", self.settings.request);
        Ok(self.settings.request.clone())
    }

    async fn transform(&self, request: ChatLinkRequest) -> Result<Option<LinkOutput>> {
        let (Some(phone), Some(link)) = (request.normalized_phone(), request.deep_link()) else {
            tracing::warn!("No phone number given, nothing to generate");
            return Ok(None);
        };

        let style = &self.settings.style;
        let png = if self.settings.formats.contains(&QrFormat::Png) {
            Some(render_png(&link, style)?)
        } else {
            None
        };
        let svg = if self.settings.formats.contains(&QrFormat::Svg) {
            Some(render_svg(&link, style)?)
        } else {
            None
        };

        Ok(Some(LinkOutput {
            phone,
            link,
            png,
            svg,
        }))
    }

    async fn export(&self, output: Option<LinkOutput>) -> Result<Vec<String>> {
        let Some(output) = output else {
            return Ok(Vec::new());
        };

        println!("🔗 {}", output.link);

        let mut written = Vec::new();
        if let Some(png) = &output.png {
            let name = qr_file_name(&output.phone, QrFormat::Png);
            self.storage.write_file(&name, png).await?;
            written.push(format!("{}/{}", self.settings.output_path, name));
        }
        if let Some(svg) = &output.svg {
            let name = qr_file_name(&output.phone, QrFormat::Svg);
            self.storage.write_file(&name, svg.as_bytes()).await?;
            written.push(format!("{}/{}", self.settings.output_path, name));
        }

        if self.settings.copy {
            self.copy_to_clipboard(&output.link);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::utils::error::ZaloError;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::TempDir;

    struct AcceptingClipboard;

    impl ClipboardSink for AcceptingClipboard {
        fn set_text(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    static REQUESTED_HOLD_MS: AtomicU64 = AtomicU64::new(0);

    fn accepting(hold: Duration) -> Result<Box<dyn ClipboardSink>> {
        REQUESTED_HOLD_MS.store(hold.as_millis() as u64, Ordering::SeqCst);
        Ok(Box::new(AcceptingClipboard))
    }

    fn unavailable(_hold: Duration) -> Result<Box<dyn ClipboardSink>> {
        Err(ZaloError::ClipboardError {
            message: "no display".to_string(),
        })
    }

    fn settings(phone: &str, output_path: &str, copy: bool) -> LinkSettings {
        LinkSettings {
            request: ChatLinkRequest::new(phone, "Hi there"),
            style: QrStyle::default(),
            formats: vec![QrFormat::Png, QrFormat::Svg],
            output_path: output_path.to_string(),
            copy,
            clipboard_hold: Duration::from_secs(7),
        }
    }

    #[tokio::test]
    async fn test_transform_builds_link_and_both_formats() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().into_owned();
        let tool = LinkTool::new(
            settings("0912345678", &path, false),
            LocalStorage::new(path.clone()),
            None,
        );

        let request = tool.gather().await.unwrap();
        let output = tool.transform(request).await.unwrap().unwrap();
        assert_eq!(output.link.as_str(), "https://zalo.me/84912345678?text=Hi%20there");
        assert!(output.png.is_some());
        assert!(output.svg.as_deref().unwrap().contains("<svg"));
    }

    #[tokio::test]
    async fn test_empty_phone_produces_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().into_owned();
        let tool = LinkTool::new(
            settings("", &path, true),
            LocalStorage::new(path),
            Some(accepting),
        );

        let output = tool.transform(tool.gather().await.unwrap()).await.unwrap();
        assert!(output.is_none());
        assert!(tool.export(output).await.unwrap().is_empty());
        assert!(!tool.copied(Instant::now()));
    }

    #[tokio::test]
    async fn test_copy_success_sets_indicator() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().into_owned();
        let mut s = settings("0912345678", &path, true);
        s.formats.clear();
        let tool = LinkTool::new(s, LocalStorage::new(path), Some(accepting));

        let output = tool.transform(tool.gather().await.unwrap()).await.unwrap();
        tool.export(output).await.unwrap();
        assert!(tool.copied(Instant::now()));
        assert_eq!(REQUESTED_HOLD_MS.load(Ordering::SeqCst), 7_000);
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().into_owned();
        let tool = LinkTool::new(
            settings("0912345678", &path, true),
            LocalStorage::new(path),
            Some(unavailable),
        );

        let output = tool.transform(tool.gather().await.unwrap()).await.unwrap();
        let written = tool.export(output).await.unwrap();
        assert_eq!(written.len(), 2);
        assert!(!tool.copied(Instant::now()));
    }
}
