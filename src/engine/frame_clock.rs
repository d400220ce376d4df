use std::time::Instant;

/// Per-frame timing handed to the parameter marshaller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    /// Starts at 0 and increments once per [`FrameClock::tick`]
    pub frame_number: u64,
    /// Seconds since the clock was created
    pub elapsed_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    next_frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            next_frame: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTiming {
        let timing = FrameTiming {
            frame_number: self.next_frame,
            elapsed_seconds: self.start.elapsed().as_secs_f32(),
        };
        self.next_frame += 1;
        timing
    }

    pub fn frames_ticked(&self) -> u64 {
        self.next_frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_numbers_increase() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(first.frame_number, 0);
        assert_eq!(second.frame_number, 1);
        assert!(second.elapsed_seconds >= first.elapsed_seconds);
        assert_eq!(clock.frames_ticked(), 2);
    }
}
