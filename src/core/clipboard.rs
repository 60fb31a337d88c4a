use crate::domain::model::DeepLink;
use crate::domain::ports::ClipboardSink;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

/// 「已複製」提示顯示的時間
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, Default)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        match self.copied_at {
            Some(at) => now.saturating_duration_since(at) < COPY_ACK_DURATION,
            None => false,
        }
    }
}

/// 複製連結到剪貼簿；沒有連結時不做任何事。
///
/// 失敗不重試，提示也不會出現。
pub fn copy_link<C: ClipboardSink + ?Sized>(
    sink: &mut C,
    link: Option<&DeepLink>,
    indicator: &mut CopyIndicator,
    now: Instant,
) -> Result<bool> {
    let Some(link) = link else {
        return Ok(false);
    };

    match sink.set_text(link.as_str()) {
        Ok(()) => {
            indicator.mark(now);
            tracing::debug!("📋 Copied link to clipboard: {}", link);
            Ok(true)
        }
        Err(e) => {
            tracing::warn!("📋 Failed to copy: {}", e);
            Err(e)
        }
    }
}
