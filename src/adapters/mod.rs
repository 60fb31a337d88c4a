// Adapters layer: concrete implementations of the domain ports for the host system.

#[cfg(feature = "cli")]
pub mod clipboard;
pub mod storage;

#[cfg(feature = "cli")]
pub use clipboard::SystemClipboard;
pub use storage::LocalStorage;
