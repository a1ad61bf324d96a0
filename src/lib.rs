pub mod clock;
pub mod constants;
pub mod error;
pub mod io;
pub mod logger;
pub mod segmentation;
pub mod shell;

// Re-export commonly used items for convenience
pub use clock::{ClockReplacer, Frame, Outcome};
pub use constants::*;
pub use error::{AllocError, InvalidConfiguration, PlacementError};
pub use segmentation::{FitPolicy, FreeBlock, Segment, SegmentAllocator};
