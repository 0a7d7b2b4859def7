/// Resistive divider between the battery rail and the ADC sense node.
///
/// R1 sits between the rail and the sense node, R2 between the sense node and
/// ground, so the sense node sees `rail * R2 / (R1 + R2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageDivider {
    r1: u32,
    r2: u32,
}

impl VoltageDivider {
    /// `r2` must be non-zero, see [`crate::GaugeConfig::validate`].
    pub const fn new(r1: u32, r2: u32) -> Self {
        Self { r1, r2 }
    }

    fn total(&self) -> u64 {
        self.r1 as u64 + self.r2 as u64
    }

    /// Rail voltage that produces `sense_mv` at the sense node. Saturates at
    /// `u16::MAX`.
    pub fn rail_mv(&self, sense_mv: u16) -> u16 {
        let rail = sense_mv as u64 * self.total() / self.r2 as u64;
        rail.min(u16::MAX as u64) as u16
    }

    /// Voltage seen at the sense node for a given rail voltage.
    pub fn sense_mv(&self, rail_mv: u16) -> u16 {
        (rail_mv as u64 * self.r2 as u64 / self.total()) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_resistors_double() {
        let divider = VoltageDivider::new(10_000, 10_000);
        assert_eq!(divider.rail_mv(1800), 3600);
        assert_eq!(divider.sense_mv(4200), 2100);
    }

    #[test]
    fn uneven_divider() {
        // 100k over 47k, sense node at 47/147 of the rail
        let divider = VoltageDivider::new(100_000, 47_000);
        assert_eq!(divider.rail_mv(1000), 3127);
        assert_eq!(divider.sense_mv(3127), 999);
    }

    #[test]
    fn round_trip_within_sense_resolution() {
        // 4.3:1, one millivolt lost at the sense node is at most 5 at the rail
        let divider = VoltageDivider::new(33_000, 10_000);
        for rail in (3000u16..=4200).step_by(7) {
            let rebuilt = divider.rail_mv(divider.sense_mv(rail));
            assert!(rail - rebuilt <= 5, "{} -> {}", rail, rebuilt);
        }
    }

    #[test]
    fn no_divider() {
        let divider = VoltageDivider::new(0, 1);
        assert_eq!(divider.rail_mv(2500), 2500);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let divider = VoltageDivider::new(1_000_000, 1);
        assert_eq!(divider.rail_mv(3000), u16::MAX);
    }
}
