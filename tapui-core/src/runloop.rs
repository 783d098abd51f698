//! Cooperative render/input loop
//!
//! One iteration samples the panel once, dispatches the sample, lets the
//! application react, draws, then waits for the next frame tick. The loop
//! never blocks mid-frame; long work belongs on the job queue.

use core::future::Future;
use core::ops::ControlFlow;

use tapui_display::{DisplayError, Surface};
use tapui_hal::{TouchPanel, TouchPoint};

use crate::config::TouchCalibration;
use crate::controller::Controller;
use crate::input::TouchTracker;
use crate::widget::UiEvent;

/// Errors from a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Drawing failed
    Display(DisplayError),
    /// The touch panel could not be sampled
    Touch,
}

impl From<DisplayError> for FrameError {
    fn from(e: DisplayError) -> Self {
        FrameError::Display(e)
    }
}

/// Frame pacing source
pub trait FrameTick {
    /// Wait for the next frame boundary
    fn next(&mut self) -> impl Future<Output = ()>;
}

#[cfg(feature = "embassy-time")]
impl FrameTick for embassy_time::Ticker {
    fn next(&mut self) -> impl Future<Output = ()> {
        embassy_time::Ticker::next(self)
    }
}

/// What happened during one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Event produced by the touch dispatch
    pub event: Option<UiEvent>,
    /// Uncalibrated panel sample, for [`TouchZone`](crate::input::TouchZone)s
    pub touch: Option<TouchPoint>,
}

/// Owns the panel and surface and runs frames against a controller
pub struct FrameLoop<P, S> {
    panel: P,
    surface: S,
    tracker: TouchTracker,
}

impl<P, S> FrameLoop<P, S>
where
    P: TouchPanel,
    S: Surface,
{
    pub fn new(panel: P, surface: S, calibration: TouchCalibration) -> Self {
        Self {
            panel,
            surface,
            tracker: TouchTracker::new(calibration),
        }
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Give back the panel and surface
    pub fn release(self) -> (P, S) {
        (self.panel, self.surface)
    }

    fn sample(&mut self, controller: &mut Controller<'_>) -> Result<Frame, FrameError> {
        let touch = self.panel.sample().map_err(|_| FrameError::Touch)?;
        let event = self
            .tracker
            .update(touch)
            .and_then(|input| controller.touch_dispatch(input.x, input.y, input.fresh));
        Ok(Frame { event, touch })
    }

    /// Sample, dispatch and draw once
    ///
    /// A failed sample still draws the frame before reporting
    /// [`FrameError::Touch`], so background list updates stay visible.
    pub fn frame(&mut self, controller: &mut Controller<'_>) -> Result<Frame, FrameError> {
        let frame = self.sample(controller);
        controller.draw_pass(&mut self.surface)?;
        frame
    }

    /// Sample and dispatch, run `handler`, then draw
    ///
    /// Changes the handler makes (layer switches, captions) are drawn in
    /// the same frame. When sampling fails the handler is skipped but the
    /// frame is still drawn.
    pub fn step<'a, St, R, F>(
        &mut self,
        controller: &mut Controller<'a>,
        state: &mut St,
        handler: &mut F,
    ) -> Result<ControlFlow<R>, FrameError>
    where
        St: ?Sized,
        F: FnMut(&mut St, &mut Controller<'a>, Frame) -> ControlFlow<R>,
    {
        let frame = match self.sample(controller) {
            Ok(frame) => frame,
            Err(e) => {
                controller.draw_pass(&mut self.surface)?;
                return Err(e);
            }
        };
        let flow = handler(state, controller, frame);
        controller.draw_pass(&mut self.surface)?;
        Ok(flow)
    }

    /// Run frames until `handler` breaks, pacing with `ticker`
    ///
    /// Frame errors are logged and the loop carries on with the next tick.
    pub async fn run<'a, St, R, T, F>(
        &mut self,
        controller: &mut Controller<'a>,
        ticker: &mut T,
        state: &mut St,
        mut handler: F,
    ) -> R
    where
        St: ?Sized,
        T: FrameTick,
        F: FnMut(&mut St, &mut Controller<'a>, Frame) -> ControlFlow<R>,
    {
        loop {
            match self.step(controller, state, &mut handler) {
                Ok(ControlFlow::Break(result)) => return result,
                Ok(ControlFlow::Continue(())) => {}
                Err(e) => warn!("frame failed: {}", e),
            }
            ticker.next().await;
        }
    }
}
