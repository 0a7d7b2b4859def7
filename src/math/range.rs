use super::Number;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T>
where
    T: Number
{
    min: T,
    max: T,
}

impl<T> Range<T>
where
    T: Number
{
    pub const fn new(min: T, max: T) -> Self {
        Range { min, max }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn span(&self) -> T {
        self.max - self.min
    }

    /// Maps `val` from this range onto `new_range`. `val` must not be below
    /// `min` for unsigned types.
    pub fn map_value_to_range(&self, val: T, new_range: &Range<T>) -> T {
        // scale last so integer ranges don't truncate the ratio to zero
        (val - self.min) * new_range.span() / self.span() + new_range.min
    }
}
