//=========================================================================
// Health
//=========================================================================

/// Hit points of a player or enemy.
///
/// Alive exactly while `current > 0`. Decrementing past zero clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Full health with `max` points. A zero maximum is raised to one.
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Removes one point.
    pub fn decrement(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Adds one point, up to the maximum.
    pub fn increment(&mut self) {
        self.current = self.current.saturating_add(1).min(self.max);
    }

    /// Drops straight to zero.
    pub fn die(&mut self) {
        self.current = 0;
    }

    /// Refills to the maximum.
    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1)
    }
}
