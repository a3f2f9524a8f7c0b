use std::path::PathBuf;
use std::sync::mpsc;

use tracing::{debug, error, info};

use edgezoom_render::{export_png, ExportMetadata, RenderBuffer};

/// Request sent from the UI thread to the I/O worker.
pub(crate) enum IoRequest {
    /// Encode `buffer` as PNG at `path`, creating parent dirs.
    WritePng {
        path: PathBuf,
        buffer: RenderBuffer,
        metadata: ExportMetadata,
    },
}

/// Spawn a dedicated I/O worker thread so encoding never stalls a frame.
///
/// The thread runs until the request sender is dropped.
pub(crate) fn spawn_io_worker() -> std::io::Result<mpsc::Sender<IoRequest>> {
    let (req_tx, req_rx) = mpsc::channel::<IoRequest>();

    std::thread::Builder::new()
        .name("io-worker".into())
        .spawn(move || {
            debug!("IO worker thread started");
            while let Ok(request) = req_rx.recv() {
                match request {
                    IoRequest::WritePng {
                        path,
                        buffer,
                        metadata,
                    } => {
                        if let Some(parent) = path.parent() {
                            if let Err(e) = std::fs::create_dir_all(parent) {
                                error!("IO worker: failed to create {}: {e}", parent.display());
                                continue;
                            }
                        }
                        match export_png(&buffer, &path, &metadata) {
                            Ok(()) => info!("Saved snapshot to {}", path.display()),
                            Err(e) => error!("IO worker: failed to write {}: {e}", path.display()),
                        }
                    }
                }
            }
            debug!("IO worker thread exiting");
        })?;

    Ok(req_tx)
}
