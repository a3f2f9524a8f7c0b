use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use rand::rngs::StdRng;
use tracing::{debug, error, info};

use edgezoom_render::{RenderBuffer, RenderCancel, RenderError, StepReport, ZoomSession};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Control messages from the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnimationCommand {
    /// Pick a new fractal and start over from its default view. Frames of
    /// the new run carry `session` as their session id.
    Reset { session: u64 },
    SetPaused(bool),
}

/// A finished step, already turned into pixels.
pub(crate) struct AnimationFrame {
    pub(crate) report: StepReport,
    pub(crate) buffer: RenderBuffer,
}

/// What the worker sends back to the UI.
pub(crate) enum AnimationEvent {
    Frame(AnimationFrame),
    /// A step failed and the worker paused itself; resuming retries it.
    Stalled { session: u64, message: String },
}

/// Whether the worker should keep running after a command.
enum Flow {
    Continue,
    Exit,
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Owns the zoom session and steps it at most once per `interval`.
///
/// Frames go out through a bounded channel of capacity one, so a slow UI
/// holds the worker back instead of queueing stale frames. The UI cancels
/// through `cancel` before sending [`AnimationCommand::Reset`], which makes
/// an in-flight step bail out and the reset apply immediately. Only the
/// newest of several queued resets is applied.
pub(crate) struct AnimationWorker {
    session: ZoomSession,
    rng: StdRng,
    cancel: Arc<RenderCancel>,
    interval: Duration,
    paused: bool,
    reset_pending: Option<u64>,
}

impl AnimationWorker {
    pub(crate) fn new(
        session: ZoomSession,
        rng: StdRng,
        cancel: Arc<RenderCancel>,
        interval: Duration,
    ) -> Self {
        Self {
            session,
            rng,
            cancel,
            interval,
            paused: false,
            reset_pending: None,
        }
    }

    pub(crate) fn run(
        mut self,
        ctx: egui::Context,
        rx: mpsc::Receiver<AnimationCommand>,
        tx: mpsc::SyncSender<AnimationEvent>,
    ) {
        info!(
            fractal = %self.session.spec().describe(),
            interval_ms = self.interval.as_millis(),
            "Animation worker started"
        );

        loop {
            if let Flow::Exit = self.drain_commands(&rx) {
                break;
            }
            self.apply_reset();

            if self.paused {
                match rx.recv() {
                    Ok(cmd) => self.handle(cmd),
                    Err(_) => break,
                }
                continue;
            }

            let started = Instant::now();
            match self.session.step(&self.cancel) {
                Ok(report) => {
                    let buffer = RenderBuffer::from_frame(&report.frame);
                    let frame = AnimationFrame { report, buffer };
                    if tx.send(AnimationEvent::Frame(frame)).is_err() {
                        break;
                    }
                    ctx.request_repaint();
                }
                Err(RenderError::Cancelled) => {
                    debug!("Step cancelled");
                    continue;
                }
                Err(e) => {
                    if let Flow::Exit = self.stall(&e, &tx) {
                        break;
                    }
                    ctx.request_repaint();
                    continue;
                }
            }

            let remaining = self.interval.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                continue;
            }
            match rx.recv_timeout(remaining) {
                Ok(cmd) => self.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!("Animation worker exiting");
    }

    fn drain_commands(&mut self, rx: &mpsc::Receiver<AnimationCommand>) -> Flow {
        loop {
            match rx.try_recv() {
                Ok(cmd) => self.handle(cmd),
                Err(TryRecvError::Empty) => return Flow::Continue,
                Err(TryRecvError::Disconnected) => return Flow::Exit,
            }
        }
    }

    fn handle(&mut self, cmd: AnimationCommand) {
        match cmd {
            AnimationCommand::Reset { session } => {
                self.reset_pending = Some(session);
                self.paused = false;
            }
            AnimationCommand::SetPaused(paused) => self.paused = paused,
        }
    }

    fn apply_reset(&mut self) {
        let Some(session) = self.reset_pending.take() else {
            return;
        };
        if let Err(e) = self.session.reset_as(&mut self.rng, session) {
            error!("Reset failed: {e}");
        }
    }

    /// Pause after a failed step and tell the UI. A reset or a resume retries.
    fn stall(&mut self, err: &RenderError, tx: &mpsc::SyncSender<AnimationEvent>) -> Flow {
        error!("Animation step failed: {err}");
        self.paused = true;
        let event = AnimationEvent::Stalled {
            session: self.session.session_id(),
            message: err.to_string(),
        };
        match tx.send(event) {
            Ok(()) => Flow::Continue,
            Err(_) => Flow::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgezoom_render::SessionConfig;
    use rand::SeedableRng;

    fn worker() -> AnimationWorker {
        let config = SessionConfig {
            width: 16,
            height: 16,
            ..SessionConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let session = ZoomSession::new(&mut rng, config).unwrap();
        AnimationWorker::new(
            session,
            rng,
            Arc::new(RenderCancel::new()),
            Duration::from_millis(1),
        )
    }

    fn next_frame(rx: &mpsc::Receiver<AnimationEvent>) -> AnimationFrame {
        loop {
            match rx.recv().unwrap() {
                AnimationEvent::Frame(frame) => return frame,
                AnimationEvent::Stalled { message, .. } => panic!("worker stalled: {message}"),
            }
        }
    }

    #[test]
    fn frames_flow_and_reset_bumps_session() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::sync_channel(1);
        let handle = std::thread::spawn(move || {
            worker().run(egui::Context::default(), cmd_rx, frame_tx)
        });

        let first = next_frame(&frame_rx);
        assert_eq!(first.report.session_id, 0);
        assert_eq!(first.buffer.pixels.len(), 16 * 16 * 4);

        cmd_tx.send(AnimationCommand::Reset { session: 1 }).unwrap();
        let fresh = loop {
            let frame = next_frame(&frame_rx);
            if frame.report.session_id == 1 {
                break frame;
            }
        };
        assert_eq!(fresh.report.step, 1);

        drop(cmd_tx);
        drop(frame_rx);
        handle.join().unwrap();
    }

    #[test]
    fn queued_resets_land_on_the_latest_session() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::sync_channel(1);
        cmd_tx.send(AnimationCommand::Reset { session: 1 }).unwrap();
        cmd_tx.send(AnimationCommand::Reset { session: 2 }).unwrap();
        let handle = std::thread::spawn(move || {
            worker().run(egui::Context::default(), cmd_rx, frame_tx)
        });

        let first = next_frame(&frame_rx);
        assert_eq!(first.report.session_id, 2);
        assert_eq!(first.report.step, 1);

        drop(cmd_tx);
        drop(frame_rx);
        handle.join().unwrap();
    }

    #[test]
    fn failed_step_pauses_and_reports() {
        let mut worker = worker();
        let (tx, rx) = mpsc::sync_channel(1);
        let err = RenderError::InvalidDimensions {
            width: 0,
            height: 16,
        };
        assert!(matches!(worker.stall(&err, &tx), Flow::Continue));
        assert!(worker.paused);
        match rx.try_recv().unwrap() {
            AnimationEvent::Stalled { session, message } => {
                assert_eq!(session, 0);
                assert!(message.contains("0×16"));
            }
            AnimationEvent::Frame(_) => panic!("expected a stall report"),
        }

        drop(rx);
        assert!(matches!(worker.stall(&err, &tx), Flow::Exit));
    }

    #[test]
    fn paused_worker_exits_when_ui_goes_away() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (frame_tx, _frame_rx) = mpsc::sync_channel(1);
        cmd_tx.send(AnimationCommand::SetPaused(true)).unwrap();
        let handle = std::thread::spawn(move || {
            worker().run(egui::Context::default(), cmd_rx, frame_tx)
        });
        drop(cmd_tx);
        handle.join().unwrap();
    }
}
