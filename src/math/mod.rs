use core::ops::{Add, Div, Mul, Sub};
use num_traits::{FromPrimitive, ToPrimitive};

pub mod divider;
pub mod linear_map;
pub mod range;

// ordered ring-ish numbers. Integer types are the main target here, so
// implementations have to keep multiplication before division.
pub trait Number: Copy + PartialOrd + Sub<Output = Self> + Add<Output = Self> +
    Div<Output = Self> + Mul<Output = Self> + FromPrimitive + ToPrimitive {}

impl<T> Number for T where T: Copy + PartialOrd + Sub<Output = T> + Add<Output = T> + Div<Output = T> + Mul<Output = T> + FromPrimitive + ToPrimitive {}
