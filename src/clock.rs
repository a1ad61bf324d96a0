use crate::error::InvalidConfiguration;

/// A single slot in the clock buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub occupant: Option<u32>,
    pub reference_bit: bool,
}

impl Frame {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Result of a single page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit { page: u32 },
    FaultEmptyLoad { page: u32, frame: usize },
    FaultEvict { old_page: u32, page: u32, frame: usize },
}

impl Outcome {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit { .. })
    }

    /// The page this request was for
    pub fn page(&self) -> u32 {
        match *self {
            Outcome::Hit { page }
            | Outcome::FaultEmptyLoad { page, .. }
            | Outcome::FaultEvict { page, .. } => page,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Hit { page } => write!(f, "Hit for page {}", page),
            Outcome::FaultEmptyLoad { page, frame } => {
                write!(f, "Fault - Loaded page {} into empty frame {}", page, frame)
            }
            Outcome::FaultEvict { old_page, page, frame } => write!(
                f,
                "Fault - Replaced page {} with page {} at frame {}",
                old_page, page, frame
            ),
        }
    }
}

/// Second-chance page replacement over a fixed ring of frames
#[derive(Debug, Clone)]
pub struct ClockReplacer {
    frames: Box<[Frame]>,
    hand: usize,
    hits: u64,
    faults: u64,
}

impl ClockReplacer {
    /// Create a replacer with `capacity` empty frames and the hand at frame 0
    pub fn new(capacity: usize) -> Result<Self, InvalidConfiguration> {
        if capacity == 0 {
            return Err(InvalidConfiguration::ZeroFrames);
        }

        Ok(ClockReplacer {
            frames: vec![Frame::default(); capacity].into_boxed_slice(),
            hand: 0,
            hits: 0,
            faults: 0,
        })
    }

    /// Reference `page`, loading it on a fault
    pub fn request(&mut self, page: u32) -> Outcome {
        if let Some(index) = self.find(page) {
            self.frames[index].reference_bit = true;
            self.hits += 1;
            log::debug!("page {} resident in frame {}", page, index);
            return Outcome::Hit { page };
        }

        self.faults += 1;
        let capacity = self.frames.len();

        // Every set bit is cleared on the first pass, so this ends
        // within two trips around the ring.
        loop {
            let index = self.hand;
            self.hand = (index + 1) % capacity;
            let frame = &mut self.frames[index];

            if frame.reference_bit {
                frame.reference_bit = false;
                log::debug!("second chance for frame {}", index);
                continue;
            }

            let previous = frame.occupant.replace(page);
            frame.reference_bit = true;

            return match previous {
                None => {
                    log::debug!("page {} loaded into empty frame {}", page, index);
                    Outcome::FaultEmptyLoad { page, frame: index }
                }
                Some(old_page) => {
                    log::debug!("page {} evicted from frame {} for page {}", old_page, index, page);
                    Outcome::FaultEvict { old_page, page, frame: index }
                }
            };
        }
    }

    /// Run a sequence of requests in order
    pub fn request_all(&mut self, pages: &[u32]) -> Vec<Outcome> {
        pages.iter().map(|&page| self.request(page)).collect()
    }

    fn find(&self, page: u32) -> Option<usize> {
        self.frames.iter().position(|f| f.occupant == Some(page))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn hand(&self) -> usize {
        self.hand
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn faults(&self) -> u64 {
        self.faults
    }

    /// Fraction of requests that hit; 0 before any request
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.faults;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}
