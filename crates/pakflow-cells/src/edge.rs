//! Signal edge detection for sequential cell models

/// Transition observed on a signal between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    Rising,
    Falling,
}

/// Tracks the last two samples of a signal
///
/// Signals start low, so a first sample of 1 is reported as a rising edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    previous: bool,
    current: bool,
}

impl EdgeDetector {
    pub fn new(initial: bool) -> Self {
        Self {
            previous: initial,
            current: initial,
        }
    }

    /// Record a new sample and report the edge it forms with the last one
    pub fn update(&mut self, value: bool) -> Edge {
        self.previous = self.current;
        self.current = value;
        self.edge()
    }

    pub fn edge(&self) -> Edge {
        match (self.previous, self.current) {
            (false, true) => Edge::Rising,
            (true, false) => Edge::Falling,
            _ => Edge::None,
        }
    }

    pub fn value(&self) -> bool {
        self.current
    }
}
