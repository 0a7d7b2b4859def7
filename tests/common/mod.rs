#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use ateam_battery_gauge::{
    AdcError, AdcOneshot, CalibrationReference, ChannelConfig, Clock, CurveCoefficients,
    GaugeConfig,
};
use embassy_time::{Duration, Instant};

/// Reference where one raw code is one millivolt, with a flat error curve so
/// both calibration schemes read the same.
pub const UNITY_REFERENCE: CalibrationReference = CalibrationReference {
    bias_code: 0,
    reference_code: 4000,
    reference_mv: 4000,
    curve: Some(CurveCoefficients::new([(0, 1); 5])),
};

/// 1S lipo behind a 1:1 divider
pub fn lipo_config() -> GaugeConfig {
    GaugeConfig::new(3, 3000, 4200, 10_000, 10_000)
}

pub struct MockAdc {
    pub configure_result: Result<(), AdcError>,
    pub reference: Result<CalibrationReference, AdcError>,
    pub configured: Option<(u8, ChannelConfig)>,
    pub queued: VecDeque<Result<u16, AdcError>>,
    /// returned once the queue is drained
    pub steady: u16,
    pub reads: u32,
}

impl MockAdc {
    pub fn new() -> Self {
        Self {
            configure_result: Ok(()),
            reference: Ok(UNITY_REFERENCE),
            configured: None,
            queued: VecDeque::new(),
            steady: 0,
            reads: 0,
        }
    }

    pub fn steady(raw: u16) -> Self {
        Self {
            steady: raw,
            ..Self::new()
        }
    }

    pub fn push(&mut self, raw: u16) {
        self.queued.push_back(Ok(raw));
    }

    pub fn push_err(&mut self, err: AdcError) {
        self.queued.push_back(Err(err));
    }
}

impl AdcOneshot for MockAdc {
    fn configure_channel(&mut self, channel: u8, config: ChannelConfig) -> Result<(), AdcError> {
        self.configure_result?;
        self.configured = Some((channel, config));
        Ok(())
    }

    fn calibration_reference(
        &mut self,
        _config: ChannelConfig,
    ) -> Result<CalibrationReference, AdcError> {
        self.reference
    }

    fn read_raw(&mut self, _channel: u8) -> Result<u16, AdcError> {
        self.reads += 1;
        self.queued.pop_front().unwrap_or(Ok(self.steady))
    }
}

#[derive(Default)]
pub struct MockClock {
    micros: Cell<u64>,
}

impl MockClock {
    pub fn advance(&self, duration: Duration) {
        self.micros.set(self.micros.get() + duration.as_micros());
    }

    pub fn set_micros(&self, micros: u64) {
        self.micros.set(micros);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.micros.get())
    }
}
