use num_traits::clamp;

use super::{range::Range, Number};

// Take input max and/or min (bounds), output value within new bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap<T>
where
    T: Number
{
    input_range: Range<T>,
    output_range: Range<T>,
}

impl<T> LinearMap<T>
where
    T: Number
{
    pub const fn new(input_range: Range<T>, output_range: Range<T>) -> Self {
        Self {
            input_range,
            output_range
        }
    }

    pub fn map_ranges_bounded(val: T, input_range: Range<T>, output_range: Range<T>) -> T {
        let clamped_val = clamp(val, input_range.min(), input_range.max());
        input_range.map_value_to_range(clamped_val, &output_range)
    }

    pub fn map(&self, val: T) -> T {
        self.input_range.map_value_to_range(val, &self.output_range)
    }

    pub fn map_bounded(&self, val: T) -> T {
        Self::map_ranges_bounded(val, self.input_range, self.output_range)
    }
}
