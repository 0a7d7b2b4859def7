#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod adc;
pub mod calibration;
pub mod config;
pub mod error;
pub mod filter;
pub mod gauge;
pub mod math;
pub mod shared;
pub mod time;

pub use adc::{AdcError, AdcOneshot, Attenuation, BitWidth, ChannelConfig, SharedAdc};
pub use calibration::{CalibrationReference, CalibrationScheme, CurveCoefficients, DefaultScheme, Precalibrated};
pub use config::{GaugeConfig, DEFAULT_SAMPLE_COUNT};
pub use error::{CalibrationError, ConfigError, GaugeError};
pub use gauge::{BatteryGauge, TickOutcome};
pub use shared::SharedBatteryGauge;
pub use time::{Clock, SystemClock};
