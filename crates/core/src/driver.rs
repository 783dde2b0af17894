//! Fixed-rate animation driver over a [`FlowEngine`].
//!
//! The host rendering loop calls [`AnimationDriver::frame`] once per display
//! refresh with its own timestamp; the driver self-throttles to the
//! configured frame rate and performs one evolve+draw per elapsed interval.
//! Timestamps are injected by the caller, so the state machine is fully
//! testable without a real refresh source.

use crate::engine::FlowEngine;
use crate::error::FlowError;
use crate::projection::Projection;

/// STOPPED/RUNNING state machine driving a [`FlowEngine`] at a target rate.
pub struct AnimationDriver<P: Projection> {
    engine: FlowEngine<P>,
    running: bool,
    last_tick_ms: Option<f64>,
}

impl<P: Projection> AnimationDriver<P> {
    /// Wraps an engine. The driver starts STOPPED.
    pub fn new(engine: FlowEngine<P>) -> Self {
        Self {
            engine,
            running: false,
            last_tick_ms: None,
        }
    }

    /// Transitions to RUNNING. Idempotent.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Transitions to STOPPED and immediately prevents further ticks, even
    /// for callbacks the host has already scheduled. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick_ms = None;
    }

    /// True while RUNNING.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Host callback for one display refresh at `now_ms`.
    ///
    /// Returns `true` when a tick was executed. Does nothing while STOPPED
    /// or when less than one frame interval has elapsed since the last
    /// executed tick (self-throttling: the display may refresh faster than
    /// the animation runs).
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        if let Some(last) = self.last_tick_ms {
            if now_ms - last < self.engine.config().frame_interval_ms() {
                return false;
            }
        }
        self.engine.tick();
        self.last_tick_ms = Some(now_ms);
        true
    }

    /// Handles a pan/zoom/resize: suspends ticking, rebuilds the engine for
    /// the projection's new viewport, then resumes iff it was running.
    /// No tick can observe the grid mid-rebuild.
    pub fn viewport_changed(&mut self) -> Result<(), FlowError> {
        let was_running = self.running;
        self.running = false;
        let result = self.engine.viewport_changed();
        self.running = was_running && result.is_ok();
        result
    }

    /// Switches the data time index, rebuilding the field under the same
    /// suspend/resume discipline as a viewport change.
    pub fn set_time_index(&mut self, time_index: usize) -> Result<(), FlowError> {
        let was_running = self.running;
        self.running = false;
        let result = self.engine.set_time_index(time_index);
        self.running = was_running && result.is_ok();
        result
    }

    /// Read access to the engine (current frame, config, projection).
    pub fn engine(&self) -> &FlowEngine<P> {
        &self.engine
    }

    /// Mutable access to the engine, for projection mutation before a
    /// viewport change.
    pub fn engine_mut(&mut self) -> &mut FlowEngine<P> {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowConfig;
    use crate::projection::{Equirectangular, GeoBounds};
    use crate::source::{BoxLandMask, SyntheticSwell};

    fn driver(target_fps: f64) -> AnimationDriver<Equirectangular> {
        let projection = Equirectangular::new(GeoBounds::WORLD, 80, 40).unwrap();
        let config = FlowConfig {
            target_fps,
            ..Default::default()
        };
        let engine = FlowEngine::new(
            Box::new(SyntheticSwell::default()),
            Box::new(BoxLandMask::open_ocean()),
            projection,
            config,
        )
        .unwrap();
        AnimationDriver::new(engine)
    }

    #[test]
    fn stopped_driver_never_ticks() {
        let mut d = driver(30.0);
        assert!(!d.frame(0.0));
        assert!(!d.frame(1000.0));
    }

    #[test]
    fn first_frame_after_start_ticks_immediately() {
        let mut d = driver(30.0);
        d.start();
        assert!(d.frame(5.0));
    }

    #[test]
    fn frames_inside_the_interval_are_skipped() {
        // 25 fps = 40 ms interval.
        let mut d = driver(25.0);
        d.start();
        assert!(d.frame(0.0));
        assert!(!d.frame(10.0));
        assert!(!d.frame(39.9));
        assert!(d.frame(40.0));
        assert!(!d.frame(60.0));
        assert!(d.frame(81.0));
    }

    #[test]
    fn host_refreshing_slower_than_target_ticks_every_callback() {
        // 60 fps host callbacks against a 30 fps target tick every other
        // callback; a 15 fps host ticks every callback.
        let mut d = driver(30.0);
        d.start();
        let ticked: Vec<bool> = (0..6).map(|i| d.frame(i as f64 * 66.7)).collect();
        assert!(ticked.iter().all(|&t| t), "slow host must never be skipped");
    }

    #[test]
    fn stop_is_idempotent_and_immediate() {
        let mut d = driver(30.0);
        d.start();
        assert!(d.frame(0.0));
        d.stop();
        d.stop();
        // A callback the host already scheduled arrives after stop.
        assert!(!d.frame(1000.0));
        assert!(!d.is_running());
    }

    #[test]
    fn start_is_idempotent() {
        let mut d = driver(30.0);
        d.start();
        d.start();
        assert!(d.is_running());
    }

    #[test]
    fn restart_ticks_fresh() {
        let mut d = driver(30.0);
        d.start();
        assert!(d.frame(0.0));
        d.stop();
        d.start();
        // Throttle state was cleared by stop; the next frame ticks.
        assert!(d.frame(1.0));
    }

    #[test]
    fn viewport_change_preserves_running_state() {
        let mut d = driver(30.0);
        d.start();
        d.engine_mut()
            .projection_mut()
            .set_view(GeoBounds::WORLD, 100, 50)
            .unwrap();
        d.viewport_changed().unwrap();
        assert!(d.is_running());
        assert_eq!(d.engine().frame().width(), 100);
    }

    #[test]
    fn viewport_change_while_stopped_stays_stopped() {
        let mut d = driver(30.0);
        d.viewport_changed().unwrap();
        assert!(!d.is_running());
    }

    #[test]
    fn set_time_index_keeps_driver_running() {
        let mut d = driver(30.0);
        d.start();
        d.set_time_index(3).unwrap();
        assert!(d.is_running());
        assert_eq!(d.engine().time_index(), 3);
    }
}
