//! Battery voltage and charge estimation from a divided-down ADC input.
//!
//! The gauge is driven by calling [`BatteryGauge::tick`] from a single context
//! (main loop, periodic task, timer callback). Each tick takes at most one
//! calibrated sample. Samples are averaged in blocks of
//! [`GaugeConfig::sample_count`], and only a completed block updates the
//! reported voltage, which is scaled back up through the divider ratio.
//!
//! With a tick rate configured, ticks arriving faster than
//! `tick_rate_hz * sample_count` per second are ignored, so the caller can tick
//! on every loop iteration without oversampling the ADC.
//!
//! Sample read failures are counted and skipped. The partial block is kept and
//! the next tick retries, so a single glitch costs one sample and never the
//! whole block.

use crate::adc::{AdcError, AdcOneshot, BATTERY_CHANNEL_CONFIG};
use crate::calibration::{CalibrationScheme, DefaultScheme};
use crate::config::GaugeConfig;
use crate::error::{CalibrationError, GaugeError};
use crate::filter::BlockAveragingFilter;
use crate::math::divider::VoltageDivider;
use crate::math::linear_map::LinearMap;
use crate::math::range::Range;
use crate::time::{Clock, SampleThrottle};

/// Top of the charge scale.
pub const CHARGE_FULL: u8 = u8::MAX;

/// What a single [`BatteryGauge::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// too early since the last sample, nothing happened
    Throttled,
    /// `setup` has not completed
    NotCalibrated,
    /// the sample was dropped, the block continues on the next tick
    ReadFailed(AdcError),
    /// sample stored, `samples` of the current block collected so far
    Accumulated { samples: u16 },
    /// the block completed and the voltage was updated
    Completed { voltage_mv: u16 },
}

pub struct BatteryGauge<A, C, S = DefaultScheme>
where
    A: AdcOneshot,
    C: Clock,
    S: CalibrationScheme,
{
    adc: A,
    clock: C,
    config: GaugeConfig,
    divider: VoltageDivider,
    charge_map: LinearMap<u32>,
    scheme: Option<S>,
    window: BlockAveragingFilter,
    throttle: Option<SampleThrottle>,
    voltage_mv: u16,
    read_failures: u32,
}

impl<A, C> BatteryGauge<A, C, DefaultScheme>
where
    A: AdcOneshot,
    C: Clock,
{
    /// Gauge using the platform's default calibration scheme.
    pub fn new(adc: A, clock: C, config: GaugeConfig) -> Result<Self, GaugeError> {
        Self::with_scheme(adc, clock, config)
    }
}

impl<A, C, S> BatteryGauge<A, C, S>
where
    A: AdcOneshot,
    C: Clock,
    S: CalibrationScheme,
{
    pub fn with_scheme(adc: A, clock: C, config: GaugeConfig) -> Result<Self, GaugeError> {
        config.validate()?;

        let charge_map = LinearMap::new(
            Range::new(config.voltage_min_mv as u32, config.voltage_max_mv as u32),
            Range::new(0, CHARGE_FULL as u32),
        );
        let throttle = config
            .tick_rate_hz
            .map(|hz| SampleThrottle::for_tick_rate(hz, config.sample_count));

        Ok(Self {
            adc,
            clock,
            config,
            divider: VoltageDivider::new(config.divider_r1, config.divider_r2),
            charge_map,
            scheme: None,
            window: BlockAveragingFilter::new(config.sample_count),
            throttle,
            voltage_mv: 0,
            read_failures: 0,
        })
    }

    /// Configures the battery channel and creates its calibration scheme.
    ///
    /// Must succeed before `tick` produces samples. Failure means the gauge
    /// can't report anything meaningful and startup should be aborted.
    pub fn setup(&mut self) -> Result<(), GaugeError> {
        let channel = self.config.channel;

        self.adc
            .configure_channel(channel, BATTERY_CHANNEL_CONFIG)
            .map_err(|err| {
                error!("battery channel {} config failed: {}", channel, err);
                GaugeError::ChannelConfig(err)
            })?;

        let scheme = self
            .adc
            .calibration_reference(BATTERY_CHANNEL_CONFIG)
            .map_err(CalibrationError::from)
            .and_then(|reference| S::create(reference, BATTERY_CHANNEL_CONFIG))
            .map_err(|err| {
                error!("battery channel {} calibration failed: {}", channel, err);
                GaugeError::Calibration(err)
            })?;

        self.scheme = Some(scheme);
        self.window.reset();
        if let Some(throttle) = self.throttle.as_mut() {
            throttle.reset();
        }

        info!("battery gauge ready on channel {}", channel);
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        let now = match &self.throttle {
            Some(throttle) => {
                let now = self.clock.now();
                if !throttle.ready(now) {
                    trace!("battery sample throttled");
                    return TickOutcome::Throttled;
                }
                Some(now)
            }
            None => None,
        };

        let Some(scheme) = self.scheme.as_ref() else {
            warn!("battery gauge ticked before setup");
            return TickOutcome::NotCalibrated;
        };

        let sample = match self
            .adc
            .read_raw(self.config.channel)
            .and_then(|raw| scheme.raw_to_mv(raw))
        {
            Ok(sample) => sample,
            Err(err) => {
                self.read_failures = self.read_failures.saturating_add(1);
                warn!("battery sample failed, retrying next tick: {}", err);
                return TickOutcome::ReadFailed(err);
            }
        };

        if let (Some(throttle), Some(now)) = (self.throttle.as_mut(), now) {
            throttle.arm(now);
        }

        match self.window.add_sample(sample) {
            None => TickOutcome::Accumulated {
                samples: self.window.sample_index(),
            },
            Some(sense_mv) => {
                self.voltage_mv = self.divider.rail_mv(sense_mv);
                debug!("battery {} mV (sense {} mV)", self.voltage_mv, sense_mv);
                TickOutcome::Completed {
                    voltage_mv: self.voltage_mv,
                }
            }
        }
    }

    /// Battery voltage in millivolts from the last completed block, 0 until
    /// the first block completes.
    pub fn voltage(&self) -> u16 {
        self.voltage_mv
    }

    /// Charge level, 0 at or below the min voltage and [`CHARGE_FULL`] at or
    /// above the max voltage, linear in between.
    pub fn charge(&self) -> u8 {
        self.charge_map.map_bounded(self.voltage_mv as u32) as u8
    }

    /// True once a block has completed since construction.
    pub fn has_reading(&self) -> bool {
        self.window.filtered_value().is_some()
    }

    pub fn is_calibrated(&self) -> bool {
        self.scheme.is_some()
    }

    /// Samples collected towards the current block.
    pub fn sample_index(&self) -> u16 {
        self.window.sample_index()
    }

    /// Total samples dropped due to read errors.
    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }
}
