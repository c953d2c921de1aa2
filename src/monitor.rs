//! Loop controller.
//!
//! One cooperative loop drives everything: poll the sensor, render what
//! changed, drive the alert LED, and occasionally persist the calibration
//! baseline. The loop has two phases:
//!
//! ```text
//!            first successful reading
//!  Loading ----------------------------> Steady
//!  (10 ms ticks, spinner)                (4 s ticks)
//! ```
//!
//! The transition is one-way. Every failure inside a tick is logged and the
//! tick is skipped; nothing ever stops the loop.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{OutputPin, PinState};

use crate::animations::Spinner;
use crate::baseline::{BaselineStore, SaveOutcome, Storage};
use crate::config::{BASELINE_SAVE_INTERVAL, LOADING_PHASE_SLEEP, UPDATE_INTERVAL};
use crate::render::{PreviousFrameCache, Renderer};
use crate::sensor::{GasSensor, Reading, Secondary};
use crate::surface::Surface;
use crate::time::{Clock, Sleeper};
use crate::warmup::{WarmupState, WarmupTracker};

/// Loop phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No reading rendered yet; spinner animating.
    Loading,
    /// At least one reading rendered.
    Steady,
}

impl Phase {
    /// Sleep between ticks in this phase.
    #[inline]
    pub const fn tick_interval(self) -> Duration {
        match self {
            Self::Loading => LOADING_PHASE_SLEEP,
            Self::Steady => UPDATE_INTERVAL,
        }
    }
}

/// The monitor: sensor, screen, baseline store and alert LED under one loop.
pub struct Monitor<S, D, T, C, L>
where
    S: GasSensor,
    D: Surface,
    T: Storage,
    C: Clock,
    L: OutputPin,
{
    sensor: S,
    surface: D,
    store: BaselineStore<T>,
    clock: C,
    led: L,
    renderer: Renderer,
    cache: PreviousFrameCache,
    spinner: Spinner,
    warmup: WarmupTracker,
    phase: Phase,
    last_baseline_attempt: Instant,
}

impl<S, D, T, C, L> Monitor<S, D, T, C, L>
where
    S: GasSensor,
    D: Surface,
    T: Storage,
    C: Clock,
    L: OutputPin,
{
    /// Assemble the monitor. Warm-up and spinner timers start now.
    pub fn new(
        sensor: S,
        surface: D,
        store: BaselineStore<T>,
        clock: C,
        led: L,
    ) -> Self {
        let now = clock.now();
        Self {
            sensor,
            surface,
            store,
            clock,
            led,
            renderer: Renderer::new(),
            cache: PreviousFrameCache::new(),
            spinner: Spinner::new(now),
            warmup: WarmupTracker::new(now),
            phase: Phase::Loading,
            last_baseline_attempt: now,
        }
    }

    #[inline]
    pub const fn phase(&self) -> Phase { self.phase }

    #[inline]
    pub const fn cache(&self) -> &PreviousFrameCache { &self.cache }

    pub fn sensor(&self) -> &S { &self.sensor }

    pub fn surface(&self) -> &D { &self.surface }

    pub fn store(&self) -> &BaselineStore<T> { &self.store }

    pub fn led(&self) -> &L { &self.led }

    /// Boot sequence: identify the sensor, start measuring, restore the
    /// stored baseline and put up the loading screen.
    pub async fn start(&mut self) {
        log_info!("Sensor: {:?}", S::KIND);
        match self.sensor.serial_number().await {
            Ok(serial) => log_info!("Serial number: 0x{:x}", serial),
            Err(e) => log_warn!("Could not read serial number: {}", e),
        }

        if let Err(e) = self.sensor.start_measurement().await {
            log_warn!("Could not start measurement: {}", e);
        }

        if let Some(record) = self.store.load()
            && let Err(e) = self.sensor.restore_baseline(record).await
        {
            log_warn!("Could not restore baseline: {}", e);
        }

        self.led.set_low().ok();
        self.renderer.show_loading(&mut self.surface);
        log_info!("Waiting for first measurement....");
    }

    /// Run one loop iteration and return how long to sleep before the next.
    pub async fn tick(&mut self) -> Duration {
        let now = self.clock.now();

        match self.phase {
            Phase::Loading => {
                let warming = S::NEEDS_WARMUP && !self.warmup.state(now).is_warmed_up();
                if warming || !self.poll(now).await {
                    self.animate(now);
                }
                if self.phase == Phase::Steady {
                    log_info!("First reading after {} ms", self.warmup.elapsed(now).as_millis());
                }
            }
            Phase::Steady => {
                self.poll(now).await;
            }
        }

        self.phase.tick_interval()
    }

    /// `start`, then tick and sleep forever.
    pub async fn run<P: Sleeper>(
        &mut self,
        sleeper: &mut P,
    ) -> ! {
        self.start().await;
        loop {
            let interval = self.tick().await;
            sleeper.sleep(interval).await;
        }
    }

    /// Poll the sensor and render a fresh reading. Returns whether one was rendered.
    async fn poll(
        &mut self,
        now: Instant,
    ) -> bool {
        let reading = match self.sensor.has_new_sample().await {
            Ok(false) => return false,
            Ok(true) => self.sensor.read().await,
            Err(e) => Err(e),
        };

        match reading {
            Ok(reading) => {
                self.show(&reading);
                self.maybe_save_baseline(now).await;
                true
            }
            Err(e) => {
                log_warn!("Error reading sensor: {}", e);
                false
            }
        }
    }

    fn show(
        &mut self,
        reading: &Reading,
    ) {
        match reading.secondary {
            Secondary::Temperature(f) => log_info!(
                "CO2: {}ppm, Temperature: {}F, Humidity: {}%",
                reading.co2_ppm,
                f,
                reading.humidity.unwrap_or(0)
            ),
            Secondary::Voc(ppb) => log_info!("CO2: {}ppm, VOC: {}ppb", reading.co2_ppm, ppb),
        }

        self.renderer.render(&mut self.surface, reading, &mut self.cache);
        self.led.set_state(PinState::from(reading.alert())).ok();
        self.phase = Phase::Steady;
    }

    fn animate(
        &mut self,
        now: Instant,
    ) {
        if let Some(glyph) = self.spinner.poll(now) {
            self.renderer.show_spinner_frame(&mut self.surface, S::KIND, glyph);
        }
    }

    /// Persist the sensor baseline, at most once per [`BASELINE_SAVE_INTERVAL`].
    ///
    /// Failures are logged and never leave this function.
    pub async fn maybe_save_baseline(
        &mut self,
        now: Instant,
    ) {
        let due = now
            .checked_duration_since(self.last_baseline_attempt)
            .is_some_and(|since| since > BASELINE_SAVE_INTERVAL);
        if !due {
            return;
        }
        self.last_baseline_attempt = now;

        if self.warmup.state(now) != WarmupState::FullyCalibrated {
            log_debug!("Baseline not saved yet: still calibrating");
            return;
        }

        let record = match self.sensor.baseline().await {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                log_warn!("Error reading baseline: {}", e);
                return;
            }
        };

        match self.store.save(record, self.warmup.elapsed(now)) {
            Ok(SaveOutcome::Skipped) => log_debug!("Baseline not saved yet: still calibrating"),
            Ok(SaveOutcome::Written | SaveOutcome::ReadOnly) => {}
            Err(e) => log_error!("Error saving baseline: {}", e),
        }
    }
}
