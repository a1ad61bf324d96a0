// total addressable space of the segmentation simulator ~bytes
pub const MEMORY_SIZE: usize = 5000;

// width of the name column in the rendered memory map
pub const NAME_COLUMN_WIDTH: usize = 8;

pub const QUIT_COMMANDS: [&str; 2] = ["quit", "exit"];

// Clock boundary messages
pub const MSG_EMPTY_PAGE: &str = "Please enter a page number.";
pub const MSG_NEGATIVE_PAGE: &str = "Page number cannot be negative.";
pub const MSG_INVALID_PAGE: &str = "Invalid input. Please enter an integer page number.";
pub const MSG_INVALID_FRAMES: &str = "Invalid input. Please enter a number.";
pub const MSG_NON_POSITIVE_FRAMES: &str = "Number of frames must be positive.";

// Segmentation boundary messages
pub const MSG_INVALID_SIZE: &str = "Size must be an integer.";
pub const MSG_NON_POSITIVE_SIZE: &str = "Size must be positive.";
pub const MSG_INVALID_BASE: &str = "Base address must be a valid integer.";
pub const MSG_INVALID_MANUAL: &str = "Invalid manual allocation: overlaps or out of bounds.";
