use core::cell::RefCell;
use core::fmt;

use crate::calibration::CalibrationReference;

/// Input attenuation of an ADC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attenuation {
    /// 0dB, roughly 0-950mV input range
    Db0,
    /// 2.5dB, roughly 0-1250mV input range
    Db2_5,
    /// 6dB, roughly 0-1750mV input range
    Db6,
    /// 12dB, roughly 0-3100mV input range
    Db12,
}

impl Attenuation {
    /// Upper end of the usable input range in millivolts.
    pub const fn max_input_mv(self) -> u16 {
        match self {
            Attenuation::Db0 => 950,
            Attenuation::Db2_5 => 1250,
            Attenuation::Db6 => 1750,
            Attenuation::Db12 => 3100,
        }
    }
}

/// Conversion resolution of an ADC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitWidth {
    Bits9,
    Bits10,
    Bits11,
    Bits12,
    Bits13,
}

impl BitWidth {
    pub const fn bits(self) -> u8 {
        match self {
            BitWidth::Bits9 => 9,
            BitWidth::Bits10 => 10,
            BitWidth::Bits11 => 11,
            BitWidth::Bits12 => 12,
            BitWidth::Bits13 => 13,
        }
    }

    pub const fn max_code(self) -> u16 {
        (1u16 << self.bits()) - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    pub attenuation: Attenuation,
    pub bit_width: BitWidth,
}

impl ChannelConfig {
    pub const fn new(attenuation: Attenuation, bit_width: BitWidth) -> Self {
        Self {
            attenuation,
            bit_width,
        }
    }
}

/// Channel setup used for battery sense inputs. 12dB covers the divider output
/// of a single lithium cell with common divider ratios.
pub const BATTERY_CHANNEL_CONFIG: ChannelConfig =
    ChannelConfig::new(Attenuation::Db12, BitWidth::Bits12);

/// Errors reported by an ADC unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// the conversion did not finish in time
    Timeout,
    /// the unit is in use by another consumer
    Busy,
    /// channel or configuration not valid for this unit
    InvalidArgument,
    /// the unit has no calibration data for the requested configuration
    NotSupported,
    /// platform specific error code
    Hardware(i32),
}

impl fmt::Display for AdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdcError::Timeout => f.write_str("adc conversion timed out"),
            AdcError::Busy => f.write_str("adc unit busy"),
            AdcError::InvalidArgument => f.write_str("invalid adc channel or configuration"),
            AdcError::NotSupported => f.write_str("adc calibration not supported"),
            AdcError::Hardware(code) => write!(f, "adc hardware error {}", code),
        }
    }
}

/// A one-shot ADC unit owned by the platform.
///
/// The gauge only borrows a unit through this trait. Implement it on top of the
/// HAL driver for the target chip, then hand the gauge either `&mut unit` or a
/// [`SharedAdc`] when several channels of one unit are in use.
///
/// Drivers that only expose calibrated readings can return millivolts from
/// `read_raw` and pair with [`crate::calibration::Precalibrated`] through
/// `BatteryGauge::with_scheme`. `calibration_reference` is still called during
/// setup, so it must succeed, but its contents are not used.
pub trait AdcOneshot {
    /// Apply attenuation and resolution to `channel`.
    fn configure_channel(&mut self, channel: u8, config: ChannelConfig) -> Result<(), AdcError>;

    /// Factory calibration data for the given channel setup.
    fn calibration_reference(
        &mut self,
        config: ChannelConfig,
    ) -> Result<CalibrationReference, AdcError>;

    /// Take a single raw conversion on `channel`.
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError>;
}

impl<A: AdcOneshot + ?Sized> AdcOneshot for &mut A {
    fn configure_channel(&mut self, channel: u8, config: ChannelConfig) -> Result<(), AdcError> {
        (**self).configure_channel(channel, config)
    }

    fn calibration_reference(
        &mut self,
        config: ChannelConfig,
    ) -> Result<CalibrationReference, AdcError> {
        (**self).calibration_reference(config)
    }

    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        (**self).read_raw(channel)
    }
}

/// Non-owning handle to an ADC unit shared between several consumers in the
/// same execution context.
pub struct SharedAdc<'a, A: AdcOneshot> {
    unit: &'a RefCell<A>,
}

impl<'a, A: AdcOneshot> SharedAdc<'a, A> {
    pub const fn new(unit: &'a RefCell<A>) -> Self {
        Self { unit }
    }

    fn with_unit<R>(&self, f: impl FnOnce(&mut A) -> Result<R, AdcError>) -> Result<R, AdcError> {
        let mut unit = self.unit.try_borrow_mut().map_err(|_| AdcError::Busy)?;
        f(&mut unit)
    }
}

impl<'a, A: AdcOneshot> Clone for SharedAdc<'a, A> {
    fn clone(&self) -> Self {
        Self { unit: self.unit }
    }
}

impl<'a, A: AdcOneshot> AdcOneshot for SharedAdc<'a, A> {
    fn configure_channel(&mut self, channel: u8, config: ChannelConfig) -> Result<(), AdcError> {
        self.with_unit(|unit| unit.configure_channel(channel, config))
    }

    fn calibration_reference(
        &mut self,
        config: ChannelConfig,
    ) -> Result<CalibrationReference, AdcError> {
        self.with_unit(|unit| unit.calibration_reference(config))
    }

    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        self.with_unit(|unit| unit.read_raw(channel))
    }
}
