use crate::domain::ports::ClipboardSink;
use crate::utils::error::{Result, ZaloError};
use std::time::Duration;

fn clipboard_error(e: arboard::Error) -> ZaloError {
    ZaloError::ClipboardError {
        message: e.to_string(),
    }
}

/// 透過 arboard 寫入系統剪貼簿
///
/// X11/Wayland 上內容由本程序提供，程序結束就消失，
/// 所以 Linux 上會等到別的程式接手或 `hold` 到期才返回。
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    hold: Duration,
}

impl SystemClipboard {
    pub fn new(hold: Duration) -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(clipboard_error)?;
        Ok(Self { inner, hold })
    }
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn set_text(&mut self, text: &str) -> Result<()> {
        use arboard::SetExtLinux;

        if self.hold.is_zero() {
            return self.inner.set_text(text).map_err(clipboard_error);
        }

        eprintln!(
            "📋 Keeping the link on the clipboard for up to {}s (Ctrl+C to stop)",
            self.hold.as_secs()
        );
        self.inner
            .set()
            .wait_until(std::time::Instant::now() + self.hold)
            .text(text)
            .map_err(clipboard_error)
    }

    #[cfg(not(target_os = "linux"))]
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text).map_err(clipboard_error)
    }
}
