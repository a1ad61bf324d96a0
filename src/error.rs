//! Error types returned by the simulator engines.
//!
//! Every failing engine operation leaves its state exactly as it was before
//! the call, so all of these are recoverable from the caller's side.

use std::fmt;

use crate::segmentation::FitPolicy;

/// An engine was asked to start with a zero-sized resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidConfiguration {
    /// Clock buffer with no frames
    ZeroFrames,
    /// Address space with no bytes
    ZeroMemory,
}

impl fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidConfiguration::ZeroFrames => write!(f, "number of frames must be positive"),
            InvalidConfiguration::ZeroMemory => write!(f, "memory size must be positive"),
        }
    }
}

impl std::error::Error for InvalidConfiguration {}

/// Failure of a policy-driven allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// No free block satisfies the policy; compacting may help
    NoFit { size: usize, policy: FitPolicy },
    /// Zero-byte segments are not allowed
    InvalidSize,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::NoFit { size, policy } => {
                write!(f, "no free block of at least {} bytes under {}", size, policy)
            }
            AllocError::InvalidSize => write!(f, "segment size must be positive"),
        }
    }
}

impl std::error::Error for AllocError {}

/// Failure of a fixed-address allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    InvalidSize,
    /// `[base, base + size)` runs past the end of memory
    OutOfBounds { base: usize, size: usize, memory_size: usize },
    /// The range intersects the named segment
    Overlap { name: String },
    /// The range is not entirely covered by free blocks
    NotFree { base: usize, size: usize },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::InvalidSize => write!(f, "segment size must be positive"),
            PlacementError::OutOfBounds { base, size, memory_size } => write!(
                f,
                "range [{}, {}) exceeds memory size {}",
                base,
                base.saturating_add(*size),
                memory_size
            ),
            PlacementError::Overlap { name } => write!(f, "range overlaps segment {}", name),
            PlacementError::NotFree { base, size } => {
                write!(f, "range [{}, {}) is not free", base, base + size)
            }
        }
    }
}

impl std::error::Error for PlacementError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            InvalidConfiguration::ZeroFrames.to_string(),
            "number of frames must be positive"
        );

        let err = AllocError::NoFit { size: 300, policy: FitPolicy::BestFit };
        assert_eq!(err.to_string(), "no free block of at least 300 bytes under Best-Fit");

        let err = PlacementError::OutOfBounds { base: 4900, size: 200, memory_size: 5000 };
        assert_eq!(err.to_string(), "range [4900, 5100) exceeds memory size 5000");

        let err = PlacementError::Overlap { name: "code".to_string() };
        assert!(err.to_string().contains("code"));
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn boxed<E: std::error::Error + 'static>(e: E) -> Box<dyn std::error::Error> {
            Box::new(e)
        }

        let errors = vec![
            boxed(InvalidConfiguration::ZeroMemory),
            boxed(AllocError::InvalidSize),
            boxed(PlacementError::NotFree { base: 0, size: 10 }),
        ];
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[2].to_string(), "range [0, 10) is not free");
    }
}
