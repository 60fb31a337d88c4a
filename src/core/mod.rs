pub mod batch;
pub mod clipboard;
pub mod collection;
pub mod engine;
pub mod phone;
pub mod qr;
pub mod sticker;
pub mod template;

pub use crate::domain::model::{
    ChatLinkRequest, DeepLink, DownloadArtifact, NormalizedPhone, ProcessedSticker, SourceImage,
    TemplateDocument, TemplateType, TemplateVariable,
};
pub use crate::domain::ports::{ClipboardSink, Storage, Tool};
pub use crate::utils::error::Result;
