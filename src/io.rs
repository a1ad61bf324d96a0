use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::clock::{ClockReplacer, Outcome};
use crate::constants::*;
use crate::segmentation::{FitPolicy, Region, SegmentAllocator};

/// Parse a frame count typed by the user
pub fn parse_capacity(text: &str) -> Result<usize, String> {
    let n: i64 = text.trim().parse().map_err(|_| MSG_INVALID_FRAMES.to_string())?;
    if n <= 0 {
        return Err(MSG_NON_POSITIVE_FRAMES.to_string());
    }
    usize::try_from(n).map_err(|_| MSG_INVALID_FRAMES.to_string())
}

/// Parse a single page request typed by the user
pub fn parse_page_request(text: &str) -> Result<u32, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MSG_EMPTY_PAGE.to_string());
    }
    let n: i64 = text.parse().map_err(|_| MSG_INVALID_PAGE.to_string())?;
    if n < 0 {
        return Err(MSG_NEGATIVE_PAGE.to_string());
    }
    u32::try_from(n).map_err(|_| MSG_INVALID_PAGE.to_string())
}

/// Read a whitespace-separated page reference string
pub fn read_page_references<P: AsRef<Path>>(path: P) -> Result<Vec<u32>, String> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read trace file: {}", e))?;
    parse_page_references(&content)
}

pub fn parse_page_references(content: &str) -> Result<Vec<u32>, String> {
    let mut pages = Vec::new();
    for token in content.split_whitespace() {
        let page = parse_page_request(token).map_err(|e| format!("Invalid page reference {}: {}", token, e))?;
        pages.push(page);
    }
    Ok(pages)
}

/// Write one rendered outcome per line
pub fn write_outcomes<P: AsRef<Path>>(path: P, outcomes: &[Outcome]) -> Result<(), String> {
    let lines: Vec<String> = outcomes.iter().map(|o| o.to_string()).collect();
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path.as_ref(), content).map_err(|e| format!("Failed to write output file: {}", e))
}

/// One row per frame, marking the frame under the hand
pub fn render_frames(clock: &ClockReplacer) -> String {
    let mut out = String::new();
    for (i, frame) in clock.frames().iter().enumerate() {
        let page = match frame.occupant {
            Some(p) => p.to_string(),
            None => "-".to_string(),
        };
        let _ = write!(out, "  [{}] P:{:<6} R:{}", i, page, u8::from(frame.reference_bit));
        if i == clock.hand() {
            out.push_str("  <- hand");
        }
        out.push('\n');
    }
    out
}

pub fn render_stats(clock: &ClockReplacer) -> String {
    format!(
        "Hits: {} | Faults: {} | Ratio: {:.2}",
        clock.hits(),
        clock.faults(),
        clock.hit_ratio()
    )
}

/// How a new segment should be placed
///
/// A manual base keeps its sign so a negative address is reported when the
/// command runs rather than rejecting the whole script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Fit(FitPolicy),
    Manual { base: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Allocate { name: String, size: usize, placement: Placement },
    Remove { name: String },
    Compact,
    Segments,
    Show,
    Quit,
}

impl Command {
    /// Whether running this command can change the memory map
    pub fn is_mutating(&self) -> bool {
        matches!(self, Command::Allocate { .. } | Command::Remove { .. } | Command::Compact)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Allocate { name, size, placement: Placement::Fit(policy) } => {
                write!(f, "alloc {} {} {}", name, size, policy)
            }
            Command::Allocate { name, size, placement: Placement::Manual { base } } => {
                write!(f, "alloc {} {} manual {}", name, size, base)
            }
            Command::Remove { name } => write!(f, "remove {}", name),
            Command::Compact => f.write_str("compact"),
            Command::Segments => f.write_str("segments"),
            Command::Show => f.write_str("show"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// Parse one command line; blank lines and `#` comments yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        "alloc" | "allocate" => parse_allocate(args)?,
        "remove" | "rm" => match args {
            [name] => Command::Remove { name: name.to_string() },
            _ => return Err("Usage: remove <name>".to_string()),
        },
        "compact" => Command::Compact,
        "segments" | "list" => Command::Segments,
        "show" | "map" => Command::Show,
        k if QUIT_COMMANDS.contains(&k) => Command::Quit,
        _ => return Err(format!("Unknown command: {}", keyword)),
    };

    Ok(Some(command))
}

fn parse_allocate(args: &[&str]) -> Result<Command, String> {
    let (name, size, method, base) = match args {
        [name, size, method] => (name, size, method, None),
        [name, size, method, base] => (name, size, method, Some(base)),
        _ => return Err("Usage: alloc <name> <size> <first|best|worst|manual> [base]".to_string()),
    };

    let size: i64 = size.parse().map_err(|_| MSG_INVALID_SIZE.to_string())?;
    if size <= 0 {
        return Err(MSG_NON_POSITIVE_SIZE.to_string());
    }
    let size = usize::try_from(size).map_err(|_| MSG_INVALID_SIZE.to_string())?;

    let placement = if method.eq_ignore_ascii_case("manual") {
        let base = base.ok_or_else(|| "Manual allocation requires a base address.".to_string())?;
        let base: i64 = base.parse().map_err(|_| MSG_INVALID_BASE.to_string())?;
        Placement::Manual { base }
    } else {
        if base.is_some() {
            return Err(format!("{} does not take a base address", method));
        }
        Placement::Fit(method.parse()?)
    };

    Ok(Command::Allocate { name: name.to_string(), size, placement })
}

/// Read a segmentation command script
pub fn read_script<P: AsRef<Path>>(path: P) -> Result<Vec<Command>, String> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read script file: {}", e))?;
    parse_script(&content)
}

pub fn parse_script(content: &str) -> Result<Vec<Command>, String> {
    let mut commands = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if let Some(command) = parse_command(line).map_err(|e| format!("Line {}: {}", i + 1, e))? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Address-ordered memory map followed by totals
pub fn render_memory(alloc: &SegmentAllocator) -> String {
    let mut out = String::new();
    for region in alloc.layout() {
        let label = match region {
            Region::Allocated(seg) => seg.name.as_str(),
            Region::Free(_) => "Free",
        };
        let _ = writeln!(
            out,
            "  [{:>5}, {:>5})  {:<width$} ({})",
            region.base(),
            region.end(),
            label,
            region.size(),
            width = NAME_COLUMN_WIDTH
        );
    }
    let _ = writeln!(
        out,
        "  allocated {} / free {} / total {}",
        alloc.total_allocated(),
        alloc.total_free(),
        alloc.memory_size()
    );
    out
}
