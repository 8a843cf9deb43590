/// Range of ray distances a hit is accepted in. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, t: f32) -> bool {
        self.min <= t && t <= self.max
    }

    /// Same start, shortened to end at `max`. Used to narrow the search
    /// once a closer hit is known.
    pub fn until(&self, max: f32) -> Self {
        Self::new(self.min, max.min(self.max))
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }
}
