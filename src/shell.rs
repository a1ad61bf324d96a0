//! Per-request handlers shared by the interactive and scripted front ends.
//!
//! Each handler takes raw or parsed user input, drives an engine, and returns
//! the message to show. Engine failures never escape as errors here; they are
//! reported the same way as bad input.

use crate::clock::ClockReplacer;
use crate::constants::*;
use crate::error::AllocError;
use crate::io::{self, Command, Placement};
use crate::segmentation::SegmentAllocator;

/// Handle one line of Clock input
pub fn handle_page_request(clock: &mut ClockReplacer, input: &str) -> String {
    match io::parse_page_request(input) {
        Ok(page) => clock.request(page).to_string(),
        Err(msg) => msg,
    }
}

/// Run one segmentation command against `alloc`
pub fn execute(alloc: &mut SegmentAllocator, command: &Command) -> String {
    match command {
        Command::Allocate { name, size, placement: Placement::Fit(policy) } => {
            match alloc.allocate(name, *size, *policy) {
                Ok(seg) => format!("Allocated {} at [{}, {}) using {}", seg.name, seg.base, seg.end(), policy),
                Err(AllocError::NoFit { .. }) => {
                    format!("No suitable block found for {}. Try again after compacting.", name)
                }
                Err(AllocError::InvalidSize) => MSG_NON_POSITIVE_SIZE.to_string(),
            }
        }
        Command::Allocate { name, size, placement: Placement::Manual { base } } => {
            let Ok(base) = usize::try_from(*base) else {
                log::info!("manual allocation of {} rejected: negative base {}", name, base);
                return MSG_INVALID_MANUAL.to_string();
            };
            match alloc.allocate_manual(name, *size, base) {
                Ok(seg) => format!("Allocated {} at [{}, {}) manually", seg.name, seg.base, seg.end()),
                Err(e) => {
                    log::info!("manual allocation of {} rejected: {}", name, e);
                    MSG_INVALID_MANUAL.to_string()
                }
            }
        }
        Command::Remove { name } => {
            if alloc.remove(name) {
                format!("Removed {}", name)
            } else {
                format!("No segment named {}", name)
            }
        }
        Command::Compact => {
            alloc.compact();
            "Memory compacted".to_string()
        }
        Command::Segments => {
            let names = alloc.segment_names();
            if names.is_empty() {
                "(no segments)".to_string()
            } else {
                names.join(" ")
            }
        }
        Command::Show => io::render_memory(alloc),
        Command::Quit => String::new(),
    }
}
