use core::fmt;

use crate::adc::AdcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// min voltage must be strictly below max voltage
    VoltageRange,
    /// the low side divider resistor can't be zero
    DividerR2,
    /// the divided-down max voltage is above the ADC input range
    SenseRange,
    SampleCount,
    TickRate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::VoltageRange => f.write_str("minimum voltage must be below maximum voltage"),
            ConfigError::DividerR2 => f.write_str("divider R2 must be non-zero"),
            ConfigError::SenseRange => f.write_str("max voltage exceeds the adc input range after the divider"),
            ConfigError::SampleCount => f.write_str("sample count must be non-zero"),
            ConfigError::TickRate => f.write_str("tick rate must be non-zero"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// reading the factory reference from the unit failed
    Adc(AdcError),
    /// the unit has no data for the selected scheme
    NotSupported,
    InvalidReference,
}

impl From<AdcError> for CalibrationError {
    fn from(err: AdcError) -> Self {
        CalibrationError::Adc(err)
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::Adc(err) => write!(f, "reading calibration reference failed: {}", err),
            CalibrationError::NotSupported => f.write_str("calibration scheme not supported by this unit"),
            CalibrationError::InvalidReference => f.write_str("invalid calibration reference"),
        }
    }
}

/// Errors that leave the gauge unable to report battery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GaugeError {
    Config(ConfigError),
    ChannelConfig(AdcError),
    Calibration(CalibrationError),
}

impl From<ConfigError> for GaugeError {
    fn from(err: ConfigError) -> Self {
        GaugeError::Config(err)
    }
}

impl From<CalibrationError> for GaugeError {
    fn from(err: CalibrationError) -> Self {
        GaugeError::Calibration(err)
    }
}

impl fmt::Display for GaugeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaugeError::Config(err) => write!(f, "invalid gauge config: {}", err),
            GaugeError::ChannelConfig(err) => write!(f, "configuring battery channel failed: {}", err),
            GaugeError::Calibration(err) => write!(f, "battery channel calibration failed: {}", err),
        }
    }
}
