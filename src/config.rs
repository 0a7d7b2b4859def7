use crate::adc::BATTERY_CHANNEL_CONFIG;
use crate::error::ConfigError;
use crate::math::divider::VoltageDivider;

pub const DEFAULT_SAMPLE_COUNT: u16 = 8;

/// Fixed gauge parameters, chosen once at construction.
///
/// `voltage_min_mv` and `voltage_max_mv` are battery (pre-divider) voltages and
/// anchor 0 and 255 on the charge scale. The divider is R1 from the battery
/// rail to the sense node and R2 from the sense node to ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GaugeConfig {
    pub channel: u8,
    pub voltage_min_mv: u16,
    pub voltage_max_mv: u16,
    pub divider_r1: u32,
    pub divider_r2: u32,
    pub sample_count: u16,
    /// caps the number of completed windows per second when set
    pub tick_rate_hz: Option<u16>,
}

impl GaugeConfig {
    pub const fn new(
        channel: u8,
        voltage_min_mv: u16,
        voltage_max_mv: u16,
        divider_r1: u32,
        divider_r2: u32,
    ) -> Self {
        Self {
            channel,
            voltage_min_mv,
            voltage_max_mv,
            divider_r1,
            divider_r2,
            sample_count: DEFAULT_SAMPLE_COUNT,
            tick_rate_hz: None,
        }
    }

    pub const fn with_sample_count(mut self, sample_count: u16) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub const fn with_tick_rate_hz(mut self, tick_rate_hz: u16) -> Self {
        self.tick_rate_hz = Some(tick_rate_hz);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voltage_min_mv >= self.voltage_max_mv {
            return Err(ConfigError::VoltageRange);
        }

        if self.divider_r2 == 0 {
            return Err(ConfigError::DividerR2);
        }

        // a full battery must still read inside the channel's input range
        let divider = VoltageDivider::new(self.divider_r1, self.divider_r2);
        let input_max_mv = BATTERY_CHANNEL_CONFIG.attenuation.max_input_mv();
        if divider.sense_mv(self.voltage_max_mv) > input_max_mv {
            return Err(ConfigError::SenseRange);
        }

        if self.sample_count == 0 {
            return Err(ConfigError::SampleCount);
        }

        if self.tick_rate_hz == Some(0) {
            return Err(ConfigError::TickRate);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1S lipo behind a 1:1 divider
    const LIPO_1S: GaugeConfig = GaugeConfig::new(3, 3000, 4200, 10_000, 10_000);

    #[test]
    fn defaults() {
        assert_eq!(LIPO_1S.sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(LIPO_1S.tick_rate_hz, None);
        assert_eq!(LIPO_1S.validate(), Ok(()));
    }

    #[test]
    fn builder_sets_optional_fields() {
        let config = LIPO_1S.with_sample_count(16).with_tick_rate_hz(2);
        assert_eq!(config.sample_count, 16);
        assert_eq!(config.tick_rate_hz, Some(2));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_voltage_range() {
        let config = GaugeConfig::new(3, 4200, 4200, 10_000, 10_000);
        assert_eq!(config.validate(), Err(ConfigError::VoltageRange));
    }

    #[test]
    fn rejects_zero_r2() {
        let config = GaugeConfig::new(3, 3000, 4200, 10_000, 0);
        assert_eq!(config.validate(), Err(ConfigError::DividerR2));
    }

    #[test]
    fn zero_r1_is_a_direct_connection() {
        let config = GaugeConfig::new(3, 2500, 3000, 0, 10_000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_sense_voltage_above_adc_range() {
        // 12dB tops out at 3100mV
        assert_eq!(GaugeConfig::new(3, 2500, 3100, 0, 1).validate(), Ok(()));
        assert_eq!(
            GaugeConfig::new(3, 2500, 3101, 0, 1).validate(),
            Err(ConfigError::SenseRange)
        );
        assert_eq!(
            GaugeConfig::new(3, 3000, 4200, 0, 1).validate(),
            Err(ConfigError::SenseRange)
        );
        // 1:1 divider brings a full 1S cell down to 2100mV
        assert_eq!(LIPO_1S.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_sample_count_and_tick_rate() {
        assert_eq!(
            LIPO_1S.with_sample_count(0).validate(),
            Err(ConfigError::SampleCount)
        );
        assert_eq!(
            LIPO_1S.with_tick_rate_hz(0).validate(),
            Err(ConfigError::TickRate)
        );
    }
}
