use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use edgezoom_core::FractalParams;
use edgezoom_render::{ExportMetadata, RenderCancel, ZoomSession};

use crate::animation::{AnimationCommand, AnimationEvent, AnimationFrame, AnimationWorker};
use crate::io_worker::{spawn_io_worker, IoRequest};
use crate::preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
pub(crate) const HUD_ALPHA: u8 = 166;

pub(crate) type AppError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct EdgeZoomApp {
    pub(crate) preferences: AppPreferences,
    pub(crate) params: FractalParams,

    // Animation worker
    pub(crate) tx_command: mpsc::Sender<AnimationCommand>,
    pub(crate) rx_frame: mpsc::Receiver<AnimationEvent>,
    pub(crate) cancel: Arc<RenderCancel>,
    /// Session id the UI expects; frames from older sessions are dropped.
    pub(crate) expected_session: u64,

    // I/O
    pub(crate) tx_io: mpsc::Sender<IoRequest>,

    // Display
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) latest: Option<AnimationFrame>,
    pub(crate) paused: bool,
    /// Why the worker stopped itself, until the next resume or reset.
    pub(crate) stalled: Option<String>,
    pub(crate) show_hud: bool,
}

impl EdgeZoomApp {
    pub(crate) fn new(egui_ctx: &egui::Context, prefs: AppPreferences) -> Result<Self, AppError> {
        let config = prefs.session_config();
        let mut rng = match prefs.seed {
            Some(seed) => {
                info!(seed, "Using fixed seed");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let session = ZoomSession::new(&mut rng, config)?;

        let (tx_command, rx_command) = mpsc::channel();
        let (tx_frame, rx_frame) = mpsc::sync_channel(1);
        let cancel = Arc::new(RenderCancel::new());

        let worker = AnimationWorker::new(
            session,
            rng,
            Arc::clone(&cancel),
            Duration::from_millis(prefs.step_interval_ms),
        );
        let ctx = egui_ctx.clone();
        thread::Builder::new()
            .name("animation".into())
            .spawn(move || worker.run(ctx, rx_command, tx_frame))?;

        let tx_io = spawn_io_worker()?;

        Ok(Self {
            params: config.params,
            show_hud: prefs.show_hud,
            preferences: prefs,
            tx_command,
            rx_frame,
            cancel,
            expected_session: 0,
            tx_io,
            texture: None,
            latest: None,
            paused: false,
            stalled: None,
        })
    }

    /// Abandon the current run and ask the worker for a new fractal.
    pub(crate) fn request_reset(&mut self) {
        self.cancel.cancel();
        self.expected_session += 1;
        self.paused = false;
        self.stalled = None;
        info!(session = self.expected_session, "Reset requested");
        self.send(AnimationCommand::Reset {
            session: self.expected_session,
        });
    }

    pub(crate) fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            self.stalled = None;
        }
        self.send(AnimationCommand::SetPaused(self.paused));
    }

    fn send(&self, cmd: AnimationCommand) {
        if self.tx_command.send(cmd).is_err() {
            warn!("Animation worker is gone, dropping {cmd:?}");
        }
    }

    /// Queue a PNG of the frame on screen.
    pub(crate) fn save_snapshot(&self) {
        let Some(latest) = &self.latest else {
            debug!("No frame to snapshot yet");
            return;
        };
        let report = &latest.report;
        let name = format!(
            "edgezoom_{}_s{}_{:05}.png",
            report.spec.kind().label().to_lowercase(),
            report.session_id,
            report.step
        );
        let path = self.preferences.snapshot_directory().join(name);
        let metadata = ExportMetadata::new(&report.spec, &report.view, self.params, report.step);
        let request = IoRequest::WritePng {
            path,
            buffer: latest.buffer.clone(),
            metadata,
        };
        if self.tx_io.send(request).is_err() {
            warn!("IO worker is gone, snapshot dropped");
        }
    }

    /// Take every finished frame, keeping only the newest current one.
    fn poll_frames(&mut self, ctx: &egui::Context) {
        let mut fresh = None;
        while let Ok(event) = self.rx_frame.try_recv() {
            match event {
                AnimationEvent::Frame(frame) if frame.report.session_id < self.expected_session => {
                    debug!(
                        session = frame.report.session_id,
                        step = frame.report.step,
                        "Dropping stale frame"
                    );
                }
                AnimationEvent::Frame(frame) => fresh = Some(frame),
                AnimationEvent::Stalled { session, .. } if session < self.expected_session => {}
                AnimationEvent::Stalled { message, .. } => {
                    warn!("Animation paused after error: {message}");
                    self.paused = true;
                    self.stalled = Some(message);
                }
            }
        }
        let Some(frame) = fresh else {
            return;
        };

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.buffer.width as usize, frame.buffer.height as usize],
            &frame.buffer.pixels,
        );
        match &mut self.texture {
            Some(tex) => tex.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("fractal", image, egui::TextureOptions::NEAREST))
            }
        }
        self.latest = Some(frame);
    }

    fn draw_frame(&self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        ui.painter().rect_filled(rect, 0.0, egui::Color32::BLACK);
        let Some(tex) = &self.texture else {
            return;
        };
        let [w, h] = tex.size();
        let image_aspect = w as f32 / h.max(1) as f32;
        let size = if rect.width() / rect.height() > image_aspect {
            egui::vec2(rect.height() * image_aspect, rect.height())
        } else {
            egui::vec2(rect.width(), rect.width() / image_aspect)
        };
        let draw_rect = egui::Rect::from_center_size(rect.center(), size);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter()
            .image(tex.id(), draw_rect, uv, egui::Color32::WHITE);
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for EdgeZoomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.poll_frames(ctx);
        self.handle_keyboard(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_frame(ui));

        self.show_hud(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.cancel.cancel();
        self.preferences.show_hud = self.show_hud;
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}
