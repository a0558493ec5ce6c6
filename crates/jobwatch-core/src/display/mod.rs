pub mod surface;
pub mod types;

// Re-export commonly used types
pub use surface::{DisplaySurface, MemorySurface, SharedSurface, shared};
pub use types::{BadgeStyle, DisplayState, FieldWrite};
