//! Dynamic segmentation over a fixed address space.
//!
//! The allocator keeps two collections: the segments in the order they were
//! created (compaction re-sorts them by base) and a list of free blocks. After
//! every successful mutation the two together cover `[0, memory_size)` exactly
//! once.
//!
//! The free list is *not* kept address-sorted. First-Fit sorts it before
//! scanning and removal sorts it while coalescing. Best-Fit and Worst-Fit
//! walk it in whatever order it currently has, so their tie-breaking depends
//! on the history of earlier operations.

use std::str::FromStr;

use crate::constants::MEMORY_SIZE;
use crate::error::{AllocError, InvalidConfiguration, PlacementError};

/// Rule used to pick a free block for a new segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPolicy {
    FirstFit,
    BestFit,
    WorstFit,
}

impl std::fmt::Display for FitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FitPolicy::FirstFit => "First-Fit",
            FitPolicy::BestFit => "Best-Fit",
            FitPolicy::WorstFit => "Worst-Fit",
        };
        f.write_str(name)
    }
}

impl FromStr for FitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "first-fit" | "ff" => Ok(FitPolicy::FirstFit),
            "best" | "best-fit" | "bf" => Ok(FitPolicy::BestFit),
            "worst" | "worst-fit" | "wf" => Ok(FitPolicy::WorstFit),
            _ => Err(format!("Unknown allocation method: {}", s)),
        }
    }
}

/// A named allocated range `[base, base + size)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub base: usize,
    pub size: usize,
}

impl Segment {
    #[inline]
    pub fn end(&self) -> usize {
        self.base + self.size
    }
}

/// An unallocated range `[base, base + size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlock {
    pub base: usize,
    pub size: usize,
}

impl FreeBlock {
    pub fn new(base: usize, size: usize) -> Self {
        FreeBlock { base, size }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.base + self.size
    }
}

/// One entry of the address-ordered memory map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region<'a> {
    Allocated(&'a Segment),
    Free(&'a FreeBlock),
}

impl Region<'_> {
    pub fn base(&self) -> usize {
        match self {
            Region::Allocated(seg) => seg.base,
            Region::Free(block) => block.base,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Region::Allocated(seg) => seg.size,
            Region::Free(block) => block.size,
        }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.base() + self.size()
    }
}

#[derive(Debug, Clone)]
pub struct SegmentAllocator {
    memory_size: usize,
    segments: Vec<Segment>,
    free: Vec<FreeBlock>,
}

impl SegmentAllocator {
    /// Create an allocator over the default `MEMORY_SIZE` bytes
    pub fn new() -> Self {
        SegmentAllocator {
            memory_size: MEMORY_SIZE,
            segments: Vec::new(),
            free: vec![FreeBlock::new(0, MEMORY_SIZE)],
        }
    }

    /// Create an allocator over `memory_size` bytes, all of it free
    pub fn with_memory_size(memory_size: usize) -> Result<Self, InvalidConfiguration> {
        if memory_size == 0 {
            return Err(InvalidConfiguration::ZeroMemory);
        }
        Ok(SegmentAllocator {
            memory_size,
            segments: Vec::new(),
            free: vec![FreeBlock::new(0, memory_size)],
        })
    }

    /// Place a segment of `size` bytes in the block chosen by `policy`
    pub fn allocate(&mut self, name: &str, size: usize, policy: FitPolicy) -> Result<Segment, AllocError> {
        if size == 0 {
            return Err(AllocError::InvalidSize);
        }

        let index = match policy {
            FitPolicy::FirstFit => self.first_fit(size),
            FitPolicy::BestFit => self.best_fit(size),
            FitPolicy::WorstFit => self.worst_fit(size),
        };

        let Some(index) = index else {
            log::info!("no fit for {} ({} bytes) under {}", name, size, policy);
            return Err(AllocError::NoFit { size, policy });
        };

        let base = self.free[index].base;
        if self.free[index].size == size {
            self.free.remove(index);
        } else {
            let block = &mut self.free[index];
            block.base += size;
            block.size -= size;
        }

        let segment = Segment { name: name.to_string(), base, size };
        log::debug!("{}: {} placed at [{}, {})", policy, name, base, segment.end());
        self.segments.push(segment.clone());

        debug_assert!(self.is_partitioned());
        Ok(segment)
    }

    /// The free list is sorted by base only once a block is known to
    /// qualify, so a failed First-Fit leaves the list order untouched.
    fn first_fit(&mut self, size: usize) -> Option<usize> {
        let base = self
            .free
            .iter()
            .filter(|b| b.size >= size)
            .map(|b| b.base)
            .min()?;

        self.free.sort_by_key(|b| b.base);
        self.free.iter().position(|b| b.base == base)
    }

    fn best_fit(&self, size: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, block) in self.free.iter().enumerate() {
            if block.size >= size && best.map_or(true, |(_, s)| block.size < s) {
                best = Some((i, block.size));
            }
        }
        best.map(|(i, _)| i)
    }

    fn worst_fit(&self, size: usize) -> Option<usize> {
        let mut worst: Option<(usize, usize)> = None;
        for (i, block) in self.free.iter().enumerate() {
            if block.size >= size && worst.map_or(true, |(_, s)| block.size > s) {
                worst = Some((i, block.size));
            }
        }
        worst.map(|(i, _)| i)
    }

    /// Place a segment at a caller-chosen base address
    ///
    /// The range is carved out of every free block it intersects; residual
    /// space before and after it is appended to the free list in that order.
    pub fn allocate_manual(&mut self, name: &str, size: usize, base: usize) -> Result<Segment, PlacementError> {
        if size == 0 {
            return Err(PlacementError::InvalidSize);
        }

        let end = match base.checked_add(size) {
            Some(end) if end <= self.memory_size => end,
            _ => {
                return Err(PlacementError::OutOfBounds { base, size, memory_size: self.memory_size });
            }
        };

        if let Some(seg) = self.segments.iter().find(|s| base < s.end() && s.base < end) {
            return Err(PlacementError::Overlap { name: seg.name.clone() });
        }

        let covered: usize = self
            .free
            .iter()
            .map(|b| b.end().min(end).saturating_sub(b.base.max(base)))
            .sum();
        if covered != size {
            return Err(PlacementError::NotFree { base, size });
        }

        let mut residuals = Vec::with_capacity(2);
        self.free.retain(|b| {
            if b.end() <= base || b.base >= end {
                return true;
            }
            if b.base < base {
                residuals.push(FreeBlock::new(b.base, base - b.base));
            }
            if b.end() > end {
                residuals.push(FreeBlock::new(end, b.end() - end));
            }
            false
        });
        self.free.extend(residuals);

        let segment = Segment { name: name.to_string(), base, size };
        log::debug!("manual: {} placed at [{}, {})", name, base, end);
        self.segments.push(segment.clone());

        debug_assert!(self.is_partitioned());
        Ok(segment)
    }

    /// Remove the first segment called `name`, returning whether one existed
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(index) = self.segments.iter().position(|s| s.name == name) else {
            return false;
        };

        let seg = self.segments.remove(index);
        log::debug!("removed {} from [{}, {})", seg.name, seg.base, seg.end());
        self.free.push(FreeBlock::new(seg.base, seg.size));
        self.merge_adjacent_free();

        debug_assert!(self.is_partitioned());
        true
    }

    /// Sort the free list by base and coalesce blocks that touch
    pub fn merge_adjacent_free(&mut self) {
        self.free.sort_by_key(|b| b.base);

        let mut i = 0;
        while i + 1 < self.free.len() {
            if self.free[i].end() == self.free[i + 1].base {
                // stay on `i`: the grown block may now touch the next one too
                let next = self.free.remove(i + 1);
                self.free[i].size += next.size;
            } else {
                i += 1;
            }
        }
    }

    /// Slide every segment down to close the gaps, leaving one free block at the top
    pub fn compact(&mut self) {
        self.segments.sort_by_key(|s| s.base);

        let mut next_base = 0;
        for seg in &mut self.segments {
            if seg.base != next_base {
                log::debug!("{} moved from {} to {}", seg.name, seg.base, next_base);
            }
            seg.base = next_base;
            next_base += seg.size;
        }

        self.free.clear();
        if next_base < self.memory_size {
            self.free.push(FreeBlock::new(next_base, self.memory_size - next_base));
        }

        debug_assert!(self.is_partitioned());
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn free_blocks(&self) -> &[FreeBlock] {
        &self.free
    }

    /// Segment names in segment order, duplicates included
    pub fn segment_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }

    #[inline]
    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn total_allocated(&self) -> usize {
        self.segments.iter().map(|s| s.size).sum()
    }

    pub fn total_free(&self) -> usize {
        self.free.iter().map(|b| b.size).sum()
    }

    /// All segments and free blocks in ascending address order
    pub fn layout(&self) -> Vec<Region<'_>> {
        let mut regions: Vec<Region<'_>> = self
            .segments
            .iter()
            .map(Region::Allocated)
            .chain(self.free.iter().map(Region::Free))
            .collect();
        regions.sort_by_key(|r| r.base());
        regions
    }

    /// Check that segments and free blocks tile `[0, memory_size)` with no
    /// gaps, overlaps or empty entries
    pub fn is_partitioned(&self) -> bool {
        let mut next = 0;
        for region in self.layout() {
            if region.size() == 0 || region.base() != next {
                return false;
            }
            next = region.end();
        }
        next == self.memory_size
    }
}

impl Default for SegmentAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(alloc: &SegmentAllocator) -> Vec<(usize, usize)> {
        alloc.free_blocks().iter().map(|b| (b.base, b.end())).collect()
    }

    fn placed(alloc: &SegmentAllocator) -> Vec<(&str, usize, usize)> {
        alloc.segments().iter().map(|s| (s.name.as_str(), s.base, s.end())).collect()
    }

    /// Three equal 500-byte holes held in the order 4500, 0, 2500
    fn unsorted_equal_holes() -> SegmentAllocator {
        let mut alloc = SegmentAllocator::new();
        alloc.allocate_manual("A", 1500, 3000).unwrap();
        alloc.allocate_manual("B", 2000, 500).unwrap();
        assert_eq!(blocks(&alloc), vec![(4500, 5000), (0, 500), (2500, 3000)]);
        alloc
    }

    #[test]
    fn test_new_allocator() {
        let alloc = SegmentAllocator::new();
        assert_eq!(alloc.memory_size(), MEMORY_SIZE);
        assert_eq!(blocks(&alloc), vec![(0, MEMORY_SIZE)]);
        assert!(alloc.segments().is_empty());
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_zero_memory_rejected() {
        assert_eq!(
            SegmentAllocator::with_memory_size(0).unwrap_err(),
            InvalidConfiguration::ZeroMemory
        );
        assert!(SegmentAllocator::with_memory_size(64).unwrap().is_partitioned());
    }

    #[test]
    fn test_first_fit_remove_compact_example() {
        let mut alloc = SegmentAllocator::new();

        let a = alloc.allocate("A", 2000, FitPolicy::FirstFit).unwrap();
        let b = alloc.allocate("B", 1000, FitPolicy::FirstFit).unwrap();
        assert_eq!((a.base, a.size), (0, 2000));
        assert_eq!((b.base, b.size), (2000, 1000));
        assert_eq!(blocks(&alloc), vec![(3000, 5000)]);

        // [0, 2000) and [3000, 5000) do not touch
        assert!(alloc.remove("A"));
        assert_eq!(blocks(&alloc), vec![(0, 2000), (3000, 5000)]);
        assert!(alloc.is_partitioned());

        alloc.compact();
        assert_eq!(placed(&alloc), vec![("B", 0, 1000)]);
        assert_eq!(blocks(&alloc), vec![(1000, 5000)]);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_exact_fit_consumes_block() {
        let mut alloc = SegmentAllocator::with_memory_size(1000).unwrap();
        alloc.allocate("all", 1000, FitPolicy::WorstFit).unwrap();
        assert!(alloc.free_blocks().is_empty());
        assert_eq!(alloc.total_allocated(), 1000);
        assert_eq!(alloc.total_free(), 0);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_no_fit_leaves_state_unchanged() {
        let mut alloc = unsorted_equal_holes();
        let before_free = blocks(&alloc);
        let before_segs = alloc.segments().to_vec();

        for policy in [FitPolicy::FirstFit, FitPolicy::BestFit, FitPolicy::WorstFit] {
            let err = alloc.allocate("big", 501, policy).unwrap_err();
            assert_eq!(err, AllocError::NoFit { size: 501, policy });
            assert_eq!(blocks(&alloc), before_free);
            assert_eq!(alloc.segments(), &before_segs[..]);
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut alloc = SegmentAllocator::new();
        assert_eq!(alloc.allocate("z", 0, FitPolicy::FirstFit), Err(AllocError::InvalidSize));
        assert_eq!(alloc.allocate_manual("z", 0, 10), Err(PlacementError::InvalidSize));
        assert!(alloc.segments().is_empty());
    }

    #[test]
    fn test_fit_policy_tie_break_order() {
        // First-Fit sorts first, so it takes the lowest address
        let mut alloc = unsorted_equal_holes();
        let seg = alloc.allocate("x", 100, FitPolicy::FirstFit).unwrap();
        assert_eq!(seg.base, 0);
        assert_eq!(blocks(&alloc), vec![(100, 500), (2500, 3000), (4500, 5000)]);

        // Best-Fit and Worst-Fit keep the first equal candidate in list order
        let mut alloc = unsorted_equal_holes();
        let seg = alloc.allocate("x", 100, FitPolicy::BestFit).unwrap();
        assert_eq!(seg.base, 4500);
        assert_eq!(blocks(&alloc), vec![(4600, 5000), (0, 500), (2500, 3000)]);

        let mut alloc = unsorted_equal_holes();
        let seg = alloc.allocate("x", 100, FitPolicy::WorstFit).unwrap();
        assert_eq!(seg.base, 4500);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_best_and_worst_fit_choose_by_size() {
        let mut alloc = SegmentAllocator::new();
        alloc.allocate_manual("A", 1000, 1000).unwrap();
        alloc.allocate_manual("B", 100, 300).unwrap();
        // holes: [2000, 5000) size 3000, [0, 300) size 300, [400, 1000) size 600
        assert_eq!(blocks(&alloc), vec![(2000, 5000), (0, 300), (400, 1000)]);

        let best = alloc.allocate("best", 250, FitPolicy::BestFit).unwrap();
        assert_eq!(best.base, 0);
        let worst = alloc.allocate("worst", 250, FitPolicy::WorstFit).unwrap();
        assert_eq!(worst.base, 2000);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_manual_carves_containing_block() {
        let mut alloc = SegmentAllocator::new();
        let seg = alloc.allocate_manual("M", 1000, 2000).unwrap();
        assert_eq!((seg.base, seg.end()), (2000, 3000));
        assert_eq!(blocks(&alloc), vec![(0, 2000), (3000, 5000)]);

        // flush against the start of a hole leaves only the tail residual
        alloc.allocate_manual("N", 500, 3000).unwrap();
        assert_eq!(blocks(&alloc), vec![(0, 2000), (3500, 5000)]);

        // filling the tail exactly leaves nothing
        alloc.allocate_manual("O", 1500, 3500).unwrap();
        assert_eq!(blocks(&alloc), vec![(0, 2000)]);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_manual_rejections_leave_state_unchanged() {
        let mut alloc = SegmentAllocator::new();
        alloc.allocate_manual("M", 1000, 2000).unwrap();
        let before = blocks(&alloc);

        assert_eq!(
            alloc.allocate_manual("X", 200, 2900),
            Err(PlacementError::Overlap { name: "M".to_string() })
        );
        assert_eq!(
            alloc.allocate_manual("X", 200, 1900),
            Err(PlacementError::Overlap { name: "M".to_string() })
        );
        assert_eq!(
            alloc.allocate_manual("X", 200, 4900),
            Err(PlacementError::OutOfBounds { base: 4900, size: 200, memory_size: 5000 })
        );
        assert!(matches!(
            alloc.allocate_manual("X", usize::MAX, 1),
            Err(PlacementError::OutOfBounds { .. })
        ));

        assert_eq!(blocks(&alloc), before);
        assert_eq!(alloc.segments().len(), 1);
    }

    #[test]
    fn test_manual_touching_neighbours_is_allowed() {
        let mut alloc = SegmentAllocator::new();
        alloc.allocate_manual("M", 1000, 2000).unwrap();
        alloc.allocate_manual("L", 100, 1900).unwrap();
        alloc.allocate_manual("R", 100, 3000).unwrap();
        assert_eq!(blocks(&alloc), vec![(0, 1900), (3100, 5000)]);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_manual_spanning_adjacent_free_blocks() {
        // adjacent but unmerged holes still tile memory
        let mut alloc = SegmentAllocator::with_memory_size(200).unwrap();
        alloc.free = vec![FreeBlock::new(0, 100), FreeBlock::new(100, 100)];
        assert!(alloc.is_partitioned());

        alloc.allocate_manual("S", 100, 50).unwrap();
        assert_eq!(blocks(&alloc), vec![(0, 50), (150, 200)]);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_manual_over_untracked_space_is_rejected() {
        let mut alloc = SegmentAllocator::with_memory_size(200).unwrap();
        alloc.free = vec![FreeBlock::new(0, 100)];

        assert_eq!(
            alloc.allocate_manual("S", 50, 80),
            Err(PlacementError::NotFree { base: 80, size: 50 })
        );
        assert_eq!(blocks(&alloc), vec![(0, 100)]);
        assert!(alloc.segments().is_empty());
    }

    #[test]
    fn test_remove_missing_name() {
        let mut alloc = SegmentAllocator::new();
        alloc.allocate("A", 100, FitPolicy::FirstFit).unwrap();
        assert!(!alloc.remove("B"));
        assert_eq!(alloc.segments().len(), 1);
    }

    #[test]
    fn test_remove_duplicate_name_takes_first() {
        let mut alloc = SegmentAllocator::new();
        alloc.allocate("dup", 100, FitPolicy::FirstFit).unwrap();
        alloc.allocate("other", 100, FitPolicy::FirstFit).unwrap();
        alloc.allocate("dup", 100, FitPolicy::FirstFit).unwrap();

        assert!(alloc.remove("dup"));
        assert_eq!(placed(&alloc), vec![("other", 100, 200), ("dup", 200, 300)]);
        assert_eq!(alloc.segment_names(), vec!["other", "dup"]);
        assert_eq!(blocks(&alloc), vec![(0, 100), (300, 5000)]);
    }

    #[test]
    fn test_remove_coalesces_transitively() {
        let mut alloc = SegmentAllocator::new();
        for name in ["a", "b", "c", "d"] {
            alloc.allocate(name, 1000, FitPolicy::FirstFit).unwrap();
        }
        // free: [4000, 5000)
        alloc.remove("b");
        alloc.remove("d");
        assert_eq!(blocks(&alloc), vec![(1000, 2000), (3000, 5000)]);

        // freeing c bridges both neighbours into one block
        alloc.remove("c");
        assert_eq!(blocks(&alloc), vec![(1000, 5000)]);

        alloc.remove("a");
        assert_eq!(blocks(&alloc), vec![(0, 5000)]);
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_merge_chain_of_touching_blocks() {
        let mut alloc = SegmentAllocator::with_memory_size(400).unwrap();
        alloc.free = vec![
            FreeBlock::new(300, 100),
            FreeBlock::new(100, 100),
            FreeBlock::new(0, 100),
            FreeBlock::new(200, 100),
        ];
        alloc.merge_adjacent_free();
        assert_eq!(blocks(&alloc), vec![(0, 400)]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut alloc = unsorted_equal_holes();
        alloc.merge_adjacent_free();
        let once = blocks(&alloc);
        assert_eq!(once, vec![(0, 500), (2500, 3000), (4500, 5000)]);

        alloc.merge_adjacent_free();
        assert_eq!(blocks(&alloc), once);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let mut alloc = unsorted_equal_holes();
        alloc.compact();
        let segs = placed(&alloc).into_iter().map(|(n, b, e)| (n.to_string(), b, e)).collect::<Vec<_>>();
        let free = blocks(&alloc);
        // B sat below A, so it moves to the front
        assert_eq!(segs, vec![("B".to_string(), 0, 2000), ("A".to_string(), 2000, 3500)]);
        assert_eq!(free, vec![(3500, 5000)]);

        alloc.compact();
        let again = placed(&alloc).into_iter().map(|(n, b, e)| (n.to_string(), b, e)).collect::<Vec<_>>();
        assert_eq!(again, segs);
        assert_eq!(blocks(&alloc), free);
    }

    #[test]
    fn test_compact_full_memory_has_no_free_block() {
        let mut alloc = SegmentAllocator::with_memory_size(300).unwrap();
        alloc.allocate_manual("b", 100, 200).unwrap();
        alloc.allocate_manual("a", 100, 0).unwrap();
        alloc.allocate_manual("m", 100, 100).unwrap();
        assert!(alloc.free_blocks().is_empty());

        alloc.compact();
        assert_eq!(placed(&alloc), vec![("a", 0, 100), ("m", 100, 200), ("b", 200, 300)]);
        assert!(alloc.free_blocks().is_empty());
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_compact_then_retry_allocation() {
        let mut alloc = SegmentAllocator::with_memory_size(1000).unwrap();
        for name in ["a", "b", "c", "d"] {
            alloc.allocate(name, 250, FitPolicy::FirstFit).unwrap();
        }
        alloc.remove("a");
        alloc.remove("c");
        assert!(alloc.allocate("wide", 400, FitPolicy::FirstFit).is_err());

        alloc.compact();
        let seg = alloc.allocate("wide", 400, FitPolicy::FirstFit).unwrap();
        assert_eq!(seg.base, 500);
        assert_eq!(blocks(&alloc), vec![(900, 1000)]);
    }

    #[test]
    fn test_partition_holds_through_mixed_operations() {
        let mut alloc = SegmentAllocator::new();
        let policies = [FitPolicy::FirstFit, FitPolicy::BestFit, FitPolicy::WorstFit];

        for i in 0..30usize {
            let name = format!("s{}", i);
            let size = 50 + (i * 137) % 400;
            let _ = alloc.allocate(&name, size, policies[i % 3]);
            assert!(alloc.is_partitioned(), "after allocate {}", name);

            if i % 4 == 1 {
                let _ = alloc.allocate_manual(&format!("m{}", i), 30, (i * 173) % 4970);
                assert!(alloc.is_partitioned(), "after manual {}", i);
            }
            if i % 3 == 2 {
                alloc.remove(&format!("s{}", i - 1));
                assert!(alloc.is_partitioned(), "after remove s{}", i - 1);
            }
            if i % 10 == 9 {
                alloc.compact();
                assert!(alloc.is_partitioned(), "after compact");
            }
        }
        assert_eq!(alloc.total_allocated() + alloc.total_free(), alloc.memory_size());
    }

    #[test]
    fn test_partition_check_detects_broken_layouts() {
        let mut alloc = SegmentAllocator::with_memory_size(200).unwrap();

        // overlapping free blocks
        alloc.free = vec![FreeBlock::new(0, 150), FreeBlock::new(100, 100)];
        assert!(!alloc.is_partitioned());

        // uncovered tail
        alloc.free = vec![FreeBlock::new(0, 100)];
        assert!(!alloc.is_partitioned());

        // segment overlapping a free block
        alloc.free = vec![FreeBlock::new(0, 200)];
        alloc.segments = vec![Segment { name: "s".to_string(), base: 50, size: 50 }];
        assert!(!alloc.is_partitioned());

        // zero-length entry
        alloc.segments.clear();
        alloc.free = vec![FreeBlock::new(0, 0), FreeBlock::new(0, 200)];
        assert!(!alloc.is_partitioned());

        alloc.free = vec![FreeBlock::new(0, 200)];
        assert!(alloc.is_partitioned());
    }

    #[test]
    fn test_layout_is_address_ordered() {
        let alloc = unsorted_equal_holes();
        let layout: Vec<(usize, usize, bool)> = alloc
            .layout()
            .iter()
            .map(|r| (r.base(), r.end(), matches!(r, Region::Free(_))))
            .collect();
        assert_eq!(
            layout,
            vec![
                (0, 500, true),
                (500, 2500, false),
                (2500, 3000, true),
                (3000, 4500, false),
                (4500, 5000, true),
            ]
        );
    }

    #[test]
    fn test_fit_policy_parsing() {
        assert_eq!("First-Fit".parse::<FitPolicy>(), Ok(FitPolicy::FirstFit));
        assert_eq!("best".parse::<FitPolicy>(), Ok(FitPolicy::BestFit));
        assert_eq!("WF".parse::<FitPolicy>(), Ok(FitPolicy::WorstFit));
        assert!("next-fit".parse::<FitPolicy>().is_err());
        assert_eq!(FitPolicy::WorstFit.to_string(), "Worst-Fit");
    }
}
