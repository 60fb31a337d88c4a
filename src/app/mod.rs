// Application layer: one tool per utility, each owning its own state.

pub mod link_tool;
pub mod sticker_tool;
pub mod zns_tool;

pub use link_tool::{ClipboardFactory, LinkOutput, LinkSettings, LinkTool};
pub use sticker_tool::{StickerSettings, StickerTool};
pub use zns_tool::{TemplateSource, ZnsSettings, ZnsTool};
