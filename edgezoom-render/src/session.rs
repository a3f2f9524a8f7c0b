use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use edgezoom_core::precision::{DEFAULT_PRECISION_BITS, MIN_PRECISION_BITS};
use edgezoom_core::{
    advance, CoreError, FractalParams, FractalSpec, ViewWindow, ZoomConfig, ZoomState, ZoomTarget,
};

use crate::edge::select_target;
use crate::error::RenderError;
use crate::evaluator::{evaluate, Arithmetic, ArithmeticMode, RenderCancel};
use crate::frame::Frame;

/// Everything fixed for the lifetime of a [`ZoomSession`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub params: FractalParams,
    pub zoom: ZoomConfig,
    pub arithmetic: ArithmeticMode,
    /// Precision of a freshly reset view, in bits.
    pub initial_precision: u32,
}

impl SessionConfig {
    pub const DEFAULT_SIZE: u32 = 800;

    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.initial_precision < MIN_PRECISION_BITS {
            return Err(CoreError::InvalidPrecision(self.initial_precision).into());
        }
        self.zoom.validate()?;
        if let Some(ceiling) = self.zoom.max_precision {
            if ceiling < self.initial_precision {
                return Err(RenderError::CeilingBelowInitial {
                    ceiling,
                    initial: self.initial_precision,
                });
            }
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            params: FractalParams::default(),
            zoom: ZoomConfig::default(),
            arithmetic: ArithmeticMode::default(),
            initial_precision: DEFAULT_PRECISION_BITS,
        }
    }
}

/// Everything one completed step produced.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Incremented on every reset; frames from an older session are stale.
    pub session_id: u64,
    /// 1-based step number within the session.
    pub step: u64,
    pub spec: FractalSpec,
    /// The view the frame was evaluated over.
    pub view: ViewWindow,
    pub frame: Frame,
    pub target: ZoomTarget,
    pub state: ZoomState,
    pub arithmetic: Arithmetic,
    pub elapsed: Duration,
}

/// The stepping loop: evaluate, pick the edge target, zoom, repeat.
///
/// Owns the fractal spec and the current view. Both are read-only while a
/// step runs and replaced only between steps.
#[derive(Debug)]
pub struct ZoomSession {
    config: SessionConfig,
    spec: FractalSpec,
    view: ViewWindow,
    step: u64,
    session_id: u64,
}

impl ZoomSession {
    /// Start a session on a randomly rolled fractal.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: SessionConfig) -> crate::Result<Self> {
        config.validate()?;
        let (spec, view) = edgezoom_core::reset::reset(rng, config.initial_precision)?;
        Ok(Self::start(config, spec, view))
    }

    /// Start a session on a chosen fractal at its family's default view.
    pub fn with_spec(config: SessionConfig, spec: FractalSpec) -> crate::Result<Self> {
        config.validate()?;
        let view = ViewWindow::default_for(spec.kind(), config.initial_precision)?;
        Ok(Self::start(config, spec, view))
    }

    fn start(config: SessionConfig, spec: FractalSpec, view: ViewWindow) -> Self {
        Self {
            config,
            spec,
            view,
            step: 0,
            session_id: 0,
        }
    }

    /// Roll a new fractal and return to its default view.
    ///
    /// The caller cancels any evaluation still running for the old session.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> crate::Result<()> {
        self.reset_as(rng, self.session_id + 1)
    }

    /// Like [`reset`](Self::reset), but the new session takes `session_id`.
    ///
    /// Lets a caller that numbers its own reset requests keep the ids of
    /// reported frames in line with what it expects.
    pub fn reset_as<R: Rng + ?Sized>(&mut self, rng: &mut R, session_id: u64) -> crate::Result<()> {
        let (spec, view) = edgezoom_core::reset::reset(rng, self.config.initial_precision)?;
        self.spec = spec;
        self.view = view;
        self.step = 0;
        self.session_id = session_id;
        info!(session_id, "Session reset");
        Ok(())
    }

    /// Run one full step and move the view on.
    ///
    /// A cancelled evaluation returns [`RenderError::Cancelled`] and leaves
    /// the session exactly as it was.
    pub fn step(&mut self, cancel: &RenderCancel) -> crate::Result<StepReport> {
        let (width, height) = (self.config.width, self.config.height);
        let result = evaluate(
            &self.view,
            &self.spec,
            self.config.params,
            width,
            height,
            self.config.arithmetic,
            cancel,
        )?;
        let target = select_target(&result.frame, &self.view)?;
        let next = advance(&self.view, &target, width, height, &self.config.zoom)?;

        let evaluated = std::mem::replace(&mut self.view, next.view);
        self.step += 1;
        debug!(
            step = self.step,
            row = target.row,
            col = target.col,
            precision = self.view.precision(),
            "Step complete"
        );

        Ok(StepReport {
            session_id: self.session_id,
            step: self.step,
            spec: self.spec.clone(),
            view: evaluated,
            frame: result.frame,
            target,
            state: next.state,
            arithmetic: result.arithmetic,
            elapsed: result.elapsed,
        })
    }

    pub fn spec(&self) -> &FractalSpec {
        &self.spec
    }

    /// The view the next step will evaluate.
    pub fn view(&self) -> &ViewWindow {
        &self.view
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> SessionConfig {
        SessionConfig {
            width: 64,
            height: 64,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn step_shrinks_scale_and_counts() {
        let mut session =
            ZoomSession::with_spec(small_config(), FractalSpec::mandelbrot(100)).unwrap();
        let before = session.view().scale().clone();
        let report = session.step(&RenderCancel::new()).unwrap();

        assert_eq!(report.step, 1);
        assert_eq!(report.session_id, 0);
        assert_eq!(report.view.scale(), &before);
        assert!(session.view().scale() < &before);
        assert_eq!(session.step_count(), 1);
        assert_eq!(report.frame.outcomes().len(), 64 * 64);
    }

    #[test]
    fn next_view_is_centered_on_target() {
        let mut session =
            ZoomSession::with_spec(small_config(), FractalSpec::mandelbrot(100)).unwrap();
        let report = session.step(&RenderCancel::new()).unwrap();
        let expected = report
            .view
            .map_pixel(report.target.row, report.target.col, 64, 64)
            .unwrap();
        assert_eq!(session.view().center(), &expected);
    }

    #[test]
    fn reset_bumps_session_and_restarts_steps() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = ZoomSession::new(&mut rng, small_config()).unwrap();
        session.step(&RenderCancel::new()).unwrap();
        session.reset(&mut rng).unwrap();

        assert_eq!(session.session_id(), 1);
        assert_eq!(session.step_count(), 0);
        assert_eq!(
            session.view(),
            &ViewWindow::default_for(session.spec().kind(), 100).unwrap()
        );
        let report = session.step(&RenderCancel::new()).unwrap();
        assert_eq!((report.session_id, report.step), (1, 1));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let zero = SessionConfig {
            width: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            ZoomSession::new(&mut rng, zero),
            Err(RenderError::InvalidDimensions { .. })
        ));
        let low = SessionConfig {
            initial_precision: 8,
            ..SessionConfig::default()
        };
        assert!(ZoomSession::new(&mut rng, low).is_err());
    }

    #[test]
    fn ceiling_below_initial_precision_is_rejected() {
        let config = SessionConfig {
            zoom: ZoomConfig::new(0.5, 1.0, Some(80)).unwrap(),
            initial_precision: 100,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RenderError::CeilingBelowInitial {
                ceiling: 80,
                initial: 100
            })
        ));

        let at_initial = SessionConfig {
            zoom: ZoomConfig::new(0.5, 1.0, Some(100)).unwrap(),
            ..config
        };
        assert!(at_initial.validate().is_ok());
    }

    #[test]
    fn reset_as_takes_the_given_session_id() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = ZoomSession::new(&mut rng, small_config()).unwrap();
        session.reset_as(&mut rng, 5).unwrap();
        assert_eq!(session.session_id(), 5);
        session.reset(&mut rng).unwrap();
        assert_eq!(session.session_id(), 6);
        let report = session.step(&RenderCancel::new()).unwrap();
        assert_eq!(report.session_id, 6);
    }
}
