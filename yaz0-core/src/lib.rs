//! # Yaz0 Core
//!
//! Core components shared by the Yaz0 codec crates.
//!
//! - [`window`]: Circular window buffer that backreferences resolve against
//! - [`traits`]: Streaming status and the resumable codec trait
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI                                                     │
//! │     yaz0 binary, file driver loop                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec                                                   │
//! │     header, groups, hash table, compress/decompress     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate)                                       │
//! │     Window, StreamCodec, Yaz0Error                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use yaz0_core::window::Window;
//!
//! let mut window = Window::new(16).unwrap();
//! window.fill_from(b"ab");
//! window.copy_match(2, 4);
//!
//! let mut out = [0u8; 8];
//! let n = window.drain_into(&mut out);
//! assert_eq!(&out[..n], b"ababab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use error::{Result, Yaz0Error};
pub use traits::{CompressionLevel, StreamCodec, StreamStatus};
pub use window::{WINDOW_SIZE, Window};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, Yaz0Error};
    pub use crate::traits::{CompressionLevel, StreamCodec, StreamStatus};
    pub use crate::window::Window;
}
