use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::{Duration, Ticker};

use crate::adc::AdcOneshot;
use crate::calibration::{CalibrationScheme, DefaultScheme};
use crate::error::GaugeError;
use crate::gauge::{BatteryGauge, TickOutcome};
use crate::time::Clock;

/// A [`BatteryGauge`] that can be ticked from one task and read from others,
/// e.g. a UI task drawing the battery icon.
///
/// Every access runs inside a critical section, so keep closures passed to
/// `lock` short and don't call back into the same gauge from inside them.
pub struct SharedBatteryGauge<A, C, S = DefaultScheme>
where
    A: AdcOneshot,
    C: Clock,
    S: CalibrationScheme,
{
    inner: Mutex<CriticalSectionRawMutex, RefCell<BatteryGauge<A, C, S>>>,
}

impl<A, C, S> SharedBatteryGauge<A, C, S>
where
    A: AdcOneshot,
    C: Clock,
    S: CalibrationScheme,
{
    pub const fn new(gauge: BatteryGauge<A, C, S>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(gauge)),
        }
    }

    pub fn lock<R>(&self, f: impl FnOnce(&mut BatteryGauge<A, C, S>) -> R) -> R {
        self.inner.lock(|gauge| f(&mut gauge.borrow_mut()))
    }

    pub fn setup(&self) -> Result<(), GaugeError> {
        self.lock(|gauge| gauge.setup())
    }

    pub fn tick(&self) -> TickOutcome {
        self.lock(|gauge| gauge.tick())
    }

    pub fn voltage(&self) -> u16 {
        self.inner.lock(|gauge| gauge.borrow().voltage())
    }

    pub fn charge(&self) -> u8 {
        self.inner.lock(|gauge| gauge.borrow().charge())
    }
}

/// Ticks `gauge` every `period`, forever. Spawn this from an embassy task.
///
/// With a tick rate configured the period can be short, the gauge throttles
/// the actual sampling on its own.
pub async fn run<A, C, S>(gauge: &SharedBatteryGauge<A, C, S>, period: Duration)
where
    A: AdcOneshot,
    C: Clock,
    S: CalibrationScheme,
{
    let mut ticker = Ticker::every(period);

    loop {
        gauge.tick();
        ticker.next().await;
    }
}
