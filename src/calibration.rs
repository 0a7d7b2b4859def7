//! Conversion of raw ADC codes into calibrated millivolts.
//!
//! Every unit ships factory reference data (see [`CalibrationReference`]): the
//! code read at 0V and the code read at a known reference voltage. Line fitting
//! scales raw codes linearly between those two points. Curve fitting also
//! subtracts a polynomial error term the platform characterised for the unit,
//! which is what the newer chips provide.
//!
//! Which scheme is used is decided at build time through the `curve-fitting`
//! feature and exposed as [`DefaultScheme`].

use crate::adc::{AdcError, BitWidth, ChannelConfig};
use crate::error::CalibrationError;

/// Reference data is always expressed in 12 bit codes.
pub const REFERENCE_BIT_WIDTH: BitWidth = BitWidth::Bits12;

/// Number of polynomial terms in a curve fitting error model.
pub const CURVE_TERMS: usize = 5;

/// Polynomial error model, `error_mv = sum(raw^i * num_i / den_i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurveCoefficients {
    pub terms: [(i64, i64); CURVE_TERMS],
}

impl CurveCoefficients {
    pub const fn new(terms: [(i64, i64); CURVE_TERMS]) -> Self {
        Self { terms }
    }

    fn error_mv(&self, code: u16) -> i128 {
        let mut power: i128 = 1;
        let mut error: i128 = 0;
        for (num, den) in self.terms {
            error += power * num as i128 / den as i128;
            power *= code as i128;
        }

        error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationReference {
    /// code read with the input tied to ground
    pub bias_code: u16,
    /// code read at `reference_mv`
    pub reference_code: u16,
    pub reference_mv: u16,
    /// only present on units characterised for curve fitting
    pub curve: Option<CurveCoefficients>,
}

pub trait CalibrationScheme: Sized {
    /// Build the scheme for a channel configured with `config`.
    fn create(reference: CalibrationReference, config: ChannelConfig) -> Result<Self, CalibrationError>;

    /// Convert a raw code taken with the configured bit width.
    fn raw_to_mv(&self, raw: u16) -> Result<u16, AdcError>;
}

fn to_reference_code(raw: u16, bit_width: BitWidth) -> u16 {
    let bits = bit_width.bits();
    let reference_bits = REFERENCE_BIT_WIDTH.bits();
    if bits < reference_bits {
        raw << (reference_bits - bits)
    } else {
        raw >> (bits - reference_bits)
    }
}

/// Two point linear calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFitting {
    bit_width: BitWidth,
    bias_code: u32,
    span_code: u32,
    reference_mv: u32,
}

impl LineFitting {
    fn reference_code(&self, raw: u16) -> Result<u16, AdcError> {
        if raw > self.bit_width.max_code() {
            return Err(AdcError::InvalidArgument);
        }

        Ok(to_reference_code(raw, self.bit_width))
    }

    fn line_mv(&self, code: u16) -> u32 {
        (code as u32).saturating_sub(self.bias_code) * self.reference_mv / self.span_code
    }
}

impl CalibrationScheme for LineFitting {
    fn create(reference: CalibrationReference, config: ChannelConfig) -> Result<Self, CalibrationError> {
        if reference.reference_code <= reference.bias_code || reference.reference_mv == 0 {
            return Err(CalibrationError::InvalidReference);
        }

        Ok(Self {
            bit_width: config.bit_width,
            bias_code: reference.bias_code as u32,
            span_code: (reference.reference_code - reference.bias_code) as u32,
            reference_mv: reference.reference_mv as u32,
        })
    }

    fn raw_to_mv(&self, raw: u16) -> Result<u16, AdcError> {
        let code = self.reference_code(raw)?;
        Ok(self.line_mv(code).min(u16::MAX as u32) as u16)
    }
}

/// Linear calibration corrected by the unit's polynomial error model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveFitting {
    line: LineFitting,
    curve: CurveCoefficients,
}

impl CalibrationScheme for CurveFitting {
    fn create(reference: CalibrationReference, config: ChannelConfig) -> Result<Self, CalibrationError> {
        let curve = reference.curve.ok_or(CalibrationError::NotSupported)?;
        if curve.terms.iter().any(|(_, den)| *den == 0) {
            return Err(CalibrationError::InvalidReference);
        }

        Ok(Self {
            line: LineFitting::create(reference, config)?,
            curve,
        })
    }

    fn raw_to_mv(&self, raw: u16) -> Result<u16, AdcError> {
        let code = self.line.reference_code(raw)?;
        let corrected = self.line.line_mv(code) as i128 - self.curve.error_mv(code);

        Ok(corrected.clamp(0, u16::MAX as i128) as u16)
    }
}

/// For units whose driver already returns calibrated millivolts from
/// `read_raw`. The reference data is ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Precalibrated;

impl CalibrationScheme for Precalibrated {
    fn create(_reference: CalibrationReference, _config: ChannelConfig) -> Result<Self, CalibrationError> {
        Ok(Self)
    }

    fn raw_to_mv(&self, raw: u16) -> Result<u16, AdcError> {
        Ok(raw)
    }
}

#[cfg(feature = "curve-fitting")]
pub type DefaultScheme = CurveFitting;

#[cfg(not(feature = "curve-fitting"))]
pub type DefaultScheme = LineFitting;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adc::{Attenuation, BATTERY_CHANNEL_CONFIG};

    const REFERENCE: CalibrationReference = CalibrationReference {
        bias_code: 0,
        reference_code: 4000,
        reference_mv: 3200,
        curve: Some(CurveCoefficients::new([(-10, 1), (1, 100), (0, 1), (0, 1), (0, 1)])),
    };

    #[test]
    fn line_fitting_scales_between_reference_points() {
        let line = LineFitting::create(REFERENCE, BATTERY_CHANNEL_CONFIG).unwrap();
        assert_eq!(line.raw_to_mv(0), Ok(0));
        assert_eq!(line.raw_to_mv(2000), Ok(1600));
        assert_eq!(line.raw_to_mv(4000), Ok(3200));
    }

    #[test]
    fn line_fitting_removes_bias() {
        let reference = CalibrationReference {
            bias_code: 100,
            reference_code: 4100,
            reference_mv: 3200,
            curve: None,
        };
        let line = LineFitting::create(reference, BATTERY_CHANNEL_CONFIG).unwrap();
        assert_eq!(line.raw_to_mv(2100), Ok(1600));
        assert_eq!(line.raw_to_mv(50), Ok(0));
    }

    #[test]
    fn line_fitting_normalizes_bit_width() {
        let config = ChannelConfig::new(Attenuation::Db12, BitWidth::Bits10);
        let line = LineFitting::create(REFERENCE, config).unwrap();
        // 500 << 2 == 2000 in reference codes
        assert_eq!(line.raw_to_mv(500), Ok(1600));
    }

    #[test]
    fn raw_code_above_bit_width_is_rejected() {
        let line = LineFitting::create(REFERENCE, BATTERY_CHANNEL_CONFIG).unwrap();
        assert_eq!(line.raw_to_mv(4096), Err(AdcError::InvalidArgument));
    }

    #[test]
    fn line_fitting_rejects_degenerate_reference() {
        let reference = CalibrationReference {
            bias_code: 4000,
            ..REFERENCE
        };
        assert_eq!(
            LineFitting::create(reference, BATTERY_CHANNEL_CONFIG),
            Err(CalibrationError::InvalidReference)
        );
    }

    #[test]
    fn curve_fitting_subtracts_error_model() {
        let curve = CurveFitting::create(REFERENCE, BATTERY_CHANNEL_CONFIG).unwrap();
        // line gives 1600, error is -10 + 2000 / 100 = 10
        assert_eq!(curve.raw_to_mv(2000), Ok(1590));
    }

    #[test]
    fn curve_fitting_needs_curve_data() {
        let reference = CalibrationReference {
            curve: None,
            ..REFERENCE
        };
        assert_eq!(
            CurveFitting::create(reference, BATTERY_CHANNEL_CONFIG),
            Err(CalibrationError::NotSupported)
        );
    }

    #[test]
    fn precalibrated_passes_millivolts_through() {
        let reference = CalibrationReference {
            bias_code: 0,
            reference_code: 0,
            reference_mv: 0,
            curve: None,
        };
        let scheme = Precalibrated::create(reference, BATTERY_CHANNEL_CONFIG).unwrap();
        assert_eq!(scheme.raw_to_mv(1800), Ok(1800));
        assert_eq!(scheme.raw_to_mv(4096), Ok(4096));
    }

    #[test]
    fn curve_fitting_rejects_zero_denominator() {
        let reference = CalibrationReference {
            curve: Some(CurveCoefficients::new([(1, 1), (1, 0), (0, 1), (0, 1), (0, 1)])),
            ..REFERENCE
        };
        assert_eq!(
            CurveFitting::create(reference, BATTERY_CHANNEL_CONFIG),
            Err(CalibrationError::InvalidReference)
        );
    }
}
