/// Averages non-overlapping blocks of `window_size` samples.
///
/// Unlike a sliding window, the output only moves once per full block, and a
/// partial block never shows up in `filtered_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAveragingFilter {
    window_size: u16,
    // u16::MAX * u16::MAX fits, so no window can overflow the sum
    accumulator: u32,
    update_ind: u16,
    filtered_value: Option<u16>,
}

impl BlockAveragingFilter {
    pub const fn new(window_size: u16) -> Self {
        Self {
            window_size,
            accumulator: 0,
            update_ind: 0,
            filtered_value: None,
        }
    }

    /// Accumulate a sample. Returns the block average when this sample
    /// completes the block, at which point accumulation restarts.
    pub fn add_sample(&mut self, sample: u16) -> Option<u16> {
        self.accumulator += sample as u32;
        self.update_ind += 1;

        if self.update_ind < self.window_size {
            return None;
        }

        let average = (self.accumulator / self.window_size as u32) as u16;
        self.accumulator = 0;
        self.update_ind = 0;
        self.filtered_value = Some(average);

        Some(average)
    }

    /// Last completed block average.
    pub fn filtered_value(&self) -> Option<u16> {
        self.filtered_value
    }

    /// Samples accumulated in the current block.
    pub fn sample_index(&self) -> u16 {
        self.update_ind
    }

    /// Drop the partial block. The last completed average is kept.
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.update_ind = 0;
    }
}
