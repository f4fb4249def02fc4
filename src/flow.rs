//! Animated flow overlay.
//!
//! The dashed overlay line appears to flow along the route because its dash
//! offset advances every frame. The host's frame callback (for example
//! `requestAnimationFrame`) drives a [`FlowTask`]; the task never schedules
//! itself. The host keeps rescheduling while [`FlowTask::on_frame`] returns
//! [`FrameOutcome::Continue`] and stops as soon as it returns
//! [`FrameOutcome::Stopped`].
//!
//! The owning map view holds the paired [`FlowHandle`]:
//!
//! - [`FlowHandle::stop`] (or dropping the handle) cancels the task when the
//!   view is torn down;
//! - [`FlowHandle::set_visible`] pauses the animation while the map is
//!   scrolled out of view. Hidden frames do no work and request no redraw.
//!
//! One writer (the tick) and one reader (the render pass) share the offset on
//! the same thread; only the control flags cross over to the handle, through
//! atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::map::{MapRenderer, PolylineId, PolylineStyle};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FlowConfig {
    /// Offset advance in pixels per second. Default: 30.0
    pub speed: f64,
    /// Wrap length used when neither the renderer nor the dash pattern gives one.
    /// Default: 20.0
    pub fallback_cycle_length: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            speed: 30.0,
            fallback_cycle_length: 20.0,
        }
    }
}

/// Dash-offset state advanced by elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowAnimation {
    offset: f64,
    speed: f64,
    cycle_length: f64,
    last_tick: Option<f64>,
}

impl FlowAnimation {
    pub fn new(speed: f64, cycle_length: f64) -> Self {
        Self {
            offset: 0.0,
            speed,
            cycle_length,
            last_tick: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Advance to `now_ms` and return the new offset.
    ///
    /// The first tick only records the timestamp. A clock that runs backwards
    /// counts as no elapsed time.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let elapsed_ms = match self.last_tick {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_tick = Some(now_ms);

        self.offset += self.speed * elapsed_ms / 1000.0;
        if self.cycle_length > 0.0 {
            self.offset = self.offset.rem_euclid(self.cycle_length);
        }
        self.offset
    }

    /// Reset the clock without advancing, so time spent paused is not replayed.
    pub fn rebase(&mut self, now_ms: f64) {
        self.last_tick = Some(now_ms);
    }
}

#[derive(Debug)]
struct FlowControl {
    running: AtomicBool,
    visible: AtomicBool,
}

/// What the host should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Request another frame
    Continue,
    /// The task was cancelled; do not reschedule
    Stopped,
}

/// The recurring per-frame update for one overlay line.
#[derive(Debug)]
pub struct FlowTask {
    line: PolylineId,
    animation: FlowAnimation,
    control: Arc<FlowControl>,
}

/// Owner-side control of a running [`FlowTask`]. Dropping it stops the task.
#[derive(Debug)]
pub struct FlowHandle {
    control: Arc<FlowControl>,
}

impl FlowTask {
    /// Start animating `line`, drawn with `style`.
    ///
    /// The offset wraps at the line's rendered length when the renderer can
    /// report it, otherwise at the dash period, otherwise at
    /// `config.fallback_cycle_length`. The task starts visible.
    pub fn start<R: MapRenderer + ?Sized>(
        line: PolylineId,
        style: &PolylineStyle,
        config: &FlowConfig,
        renderer: &R,
    ) -> (FlowTask, FlowHandle) {
        let cycle_length = renderer
            .rendered_length(line)
            .filter(|len| *len > 0.0)
            .or_else(|| style.dash_period())
            .unwrap_or(config.fallback_cycle_length);

        let control = Arc::new(FlowControl {
            running: AtomicBool::new(true),
            visible: AtomicBool::new(true),
        });

        debug!("flow overlay {:?} started, cycle {:.1}px", line, cycle_length);

        let task = FlowTask {
            line,
            animation: FlowAnimation::new(config.speed, cycle_length),
            control: Arc::clone(&control),
        };
        (task, FlowHandle { control })
    }

    /// Run one frame at host time `now_ms`.
    pub fn on_frame<R: MapRenderer + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> FrameOutcome {
        if !self.control.running.load(Ordering::Acquire) {
            return FrameOutcome::Stopped;
        }

        if !self.control.visible.load(Ordering::Acquire) {
            self.animation.rebase(now_ms);
            return FrameOutcome::Continue;
        }

        // Negative offset moves dashes forward along the line
        let offset = self.animation.tick(now_ms);
        renderer.set_dash_offset(self.line, -offset);
        FrameOutcome::Continue
    }

    pub fn offset(&self) -> f64 {
        self.animation.offset()
    }

    pub fn line(&self) -> PolylineId {
        self.line
    }
}

impl FlowHandle {
    pub fn stop(&self) {
        if self.control.running.swap(false, Ordering::AcqRel) {
            debug!("flow overlay stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.control.running.load(Ordering::Acquire)
    }

    pub fn set_visible(&self, visible: bool) {
        self.control.visible.store(visible, Ordering::Release);
    }

    pub fn is_visible(&self) -> bool {
        self.control.visible.load(Ordering::Acquire)
    }
}

impl Drop for FlowHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::RecordingRenderer;

    fn dashed() -> PolylineStyle {
        PolylineStyle::dashed("#fff", 2.0, 1.0, vec![8.0, 12.0])
    }

    #[test]
    fn test_animation_advances_and_wraps() {
        let mut anim = FlowAnimation::new(10.0, 25.0);
        assert_eq!(anim.tick(1000.0), 0.0); // first tick records time only
        assert!((anim.tick(2000.0) - 10.0).abs() < 1e-9);
        assert!((anim.tick(3500.0) - 0.0).abs() < 1e-9); // 25 wraps to 0
        assert!((anim.tick(4000.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_animation_ignores_backwards_clock() {
        let mut anim = FlowAnimation::new(10.0, 100.0);
        anim.tick(5000.0);
        anim.tick(6000.0);
        assert!((anim.tick(4000.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cycle_prefers_rendered_length() {
        let mut renderer = RecordingRenderer::default();
        renderer.length = Some(640.0);
        let (task, _handle) =
            FlowTask::start(PolylineId(1), &dashed(), &FlowConfig::default(), &renderer);
        assert_eq!(task.animation.cycle_length(), 640.0);

        renderer.length = None;
        let (task, _handle) =
            FlowTask::start(PolylineId(1), &dashed(), &FlowConfig::default(), &renderer);
        assert_eq!(task.animation.cycle_length(), 20.0);

        let solid = PolylineStyle::solid("#fff", 2.0, 1.0);
        let config = FlowConfig { speed: 30.0, fallback_cycle_length: 50.0 };
        let (task, _handle) = FlowTask::start(PolylineId(1), &solid, &config, &renderer);
        assert_eq!(task.animation.cycle_length(), 50.0);
    }

    #[test]
    fn test_frames_update_dash_offset() {
        let mut renderer = RecordingRenderer::default();
        renderer.length = Some(1000.0);
        let config = FlowConfig { speed: 30.0, ..FlowConfig::default() };
        let (mut task, _handle) = FlowTask::start(PolylineId(7), &dashed(), &config, &renderer);

        assert_eq!(task.on_frame(0.0, &mut renderer), FrameOutcome::Continue);
        assert_eq!(task.on_frame(500.0, &mut renderer), FrameOutcome::Continue);

        assert_eq!(renderer.dash_offsets.len(), 2);
        let (line, offset) = renderer.dash_offsets[1];
        assert_eq!(line, PolylineId(7));
        assert!((offset + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_hidden_frames_do_not_advance() {
        let mut renderer = RecordingRenderer::default();
        renderer.length = Some(1000.0);
        let (mut task, handle) =
            FlowTask::start(PolylineId(0), &dashed(), &FlowConfig::default(), &renderer);

        task.on_frame(0.0, &mut renderer);
        task.on_frame(1000.0, &mut renderer);
        let before = task.offset();
        let redraws = renderer.dash_offsets.len();

        handle.set_visible(false);
        assert_eq!(task.on_frame(2000.0, &mut renderer), FrameOutcome::Continue);
        assert_eq!(task.on_frame(60_000.0, &mut renderer), FrameOutcome::Continue);
        assert_eq!(task.offset(), before);
        assert_eq!(renderer.dash_offsets.len(), redraws);

        // No jump for the time spent hidden
        handle.set_visible(true);
        task.on_frame(61_000.0, &mut renderer);
        assert!((task.offset() - (before + 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_stop_and_drop_cancel() {
        let mut renderer = RecordingRenderer::default();
        let (mut task, handle) =
            FlowTask::start(PolylineId(0), &dashed(), &FlowConfig::default(), &renderer);

        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
        assert_eq!(task.on_frame(16.0, &mut renderer), FrameOutcome::Stopped);
        assert!(renderer.dash_offsets.is_empty());

        let (mut task, handle) =
            FlowTask::start(PolylineId(0), &dashed(), &FlowConfig::default(), &renderer);
        drop(handle);
        assert_eq!(task.on_frame(16.0, &mut renderer), FrameOutcome::Stopped);
    }
}
