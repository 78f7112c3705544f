use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error};
use std::thread;
use tokio::sync::{mpsc, oneshot};

use crate::error::CaptureError;

/// MIME type assigned to a recording artifact when no chunk carried one.
pub const DEFAULT_MIME_TYPE: &str = "audio/l16";

/// Media constraints for acquiring an input stream.
#[derive(Debug, Clone, Default)]
pub struct CaptureConstraints {
    /// Input device name; `None` selects the platform default.
    pub device: Option<String>,
}

/// One opaque binary fragment produced while recording.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// The finalized audio payload of one recording cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingArtifact {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl RecordingArtifact {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Platform audio input capability.
///
/// Each successful [`open`](AudioInput::open) acquires a fresh device
/// stream for exactly one recording cycle and hands back the chunk channel
/// that stream feeds.
#[async_trait]
pub trait AudioInput: Send + Sync {
    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<(Box<dyn CaptureStream>, mpsc::UnboundedReceiver<AudioChunk>), CaptureError>;
}

/// A live device stream.
///
/// [`finalize`](CaptureStream::finalize) flushes pending chunks, closes the
/// chunk channel and releases the device. The device is released even when
/// an error is reported. The chunk channel closes strictly after the last
/// emitted chunk, so draining the receiver to `None` observes every chunk.
#[async_trait]
pub trait CaptureStream: Send {
    async fn finalize(&mut self) -> Result<(), CaptureError>;
}

/* ──────────────────────────────────────────────────────────────── */

/// cpal-backed [`AudioInput`].
///
/// cpal streams are not `Send`, so each open stream lives on a dedicated
/// audio thread that parks until release and owns the `cpal::Stream` for
/// its whole lifetime.
#[derive(Debug, Clone, Default)]
pub struct CpalInput;

impl CpalInput {
    pub fn new() -> Self {
        CpalInput
    }
}

#[async_trait]
impl AudioInput for CpalInput {
    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<(Box<dyn CaptureStream>, mpsc::UnboundedReceiver<AudioChunk>), CaptureError> {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();
        let (done_tx, done_rx) = oneshot::channel();
        let device_name = constraints.device.clone();

        thread::Builder::new()
            .name("viva-capture".into())
            .spawn(move || run_capture_thread(device_name, chunk_tx, ready_tx, stop_rx, done_tx))
            .map_err(|e| CaptureError::Device(format!("failed to spawn capture thread: {e}")))?;

        match ready_rx.await {
            Ok(Ok(())) => {
                let stream = CpalStream {
                    stop_tx,
                    done_rx: Some(done_rx),
                };
                Ok((Box::new(stream), chunk_rx))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CaptureError::Device(
                "capture thread exited before the stream opened".into(),
            )),
        }
    }
}

struct CpalStream {
    stop_tx: std::sync::mpsc::Sender<()>,
    done_rx: Option<oneshot::Receiver<Result<(), CaptureError>>>,
}

#[async_trait]
impl CaptureStream for CpalStream {
    async fn finalize(&mut self) -> Result<(), CaptureError> {
        let Some(done_rx) = self.done_rx.take() else {
            return Ok(());
        };
        let _ = self.stop_tx.send(());
        match done_rx.await {
            Ok(result) => result,
            Err(_) => Err(CaptureError::Device(
                "capture thread went away during finalization".into(),
            )),
        }
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        // A dropped live stream still stops the device.
        let _ = self.stop_tx.send(());
    }
}

fn run_capture_thread(
    device_name: Option<String>,
    chunk_tx: mpsc::UnboundedSender<AudioChunk>,
    ready_tx: oneshot::Sender<Result<(), CaptureError>>,
    stop_rx: std::sync::mpsc::Receiver<()>,
    done_tx: oneshot::Sender<Result<(), CaptureError>>,
) {
    let stream = match build_input_stream(device_name, chunk_tx) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };
    let _ = ready_tx.send(Ok(()));

    // Park until the stream is released (or its handle dropped).
    let _ = stop_rx.recv();

    // Dropping the stream stops the device callbacks; the chunk sender is
    // owned by the callback closure, so the channel closes strictly after
    // the last emitted chunk.
    drop(stream);
    debug!("capture stream released");
    let _ = done_tx.send(Ok(()));
}

fn build_input_stream(
    device_name: Option<String>,
    chunk_tx: mpsc::UnboundedSender<AudioChunk>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = match device_name {
        Some(name) => host
            .input_devices()
            .map_err(device_error)?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| CaptureError::Device(format!("input device '{name}' not found")))?,
        None => host
            .default_input_device()
            .ok_or_else(|| CaptureError::Device("no input device available".into()))?,
    };

    let supported = device.default_input_config().map_err(device_error)?;
    let config: cpal::StreamConfig = supported.config();
    let mime = format!(
        "audio/l16;rate={};channels={}",
        config.sample_rate.0, config.channels
    );
    debug!(
        "opening input stream: {} ({})",
        device.name().unwrap_or_else(|_| "<unnamed>".into()),
        mime
    );

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let bytes: Vec<u8> = data
                        .iter()
                        .flat_map(|s| {
                            ((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16).to_le_bytes()
                        })
                        .collect();
                    let _ = chunk_tx.send(AudioChunk {
                        data: bytes,
                        mime_type: mime.clone(),
                    });
                },
                log_stream_error,
                None,
            )
            .map_err(device_error)?,
        cpal::SampleFormat::I16 => device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let bytes: Vec<u8> = data.iter().flat_map(|s| s.to_le_bytes()).collect();
                    let _ = chunk_tx.send(AudioChunk {
                        data: bytes,
                        mime_type: mime.clone(),
                    });
                },
                log_stream_error,
                None,
            )
            .map_err(device_error)?,
        cpal::SampleFormat::U16 => device
            .build_input_stream(
                &config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let bytes: Vec<u8> = data
                        .iter()
                        .flat_map(|s| ((*s as i32 - 0x8000) as i16).to_le_bytes())
                        .collect();
                    let _ = chunk_tx.send(AudioChunk {
                        data: bytes,
                        mime_type: mime.clone(),
                    });
                },
                log_stream_error,
                None,
            )
            .map_err(device_error)?,
        other => {
            return Err(CaptureError::Device(format!(
                "unsupported sample format {other:?}"
            )))
        }
    };

    stream.play().map_err(device_error)?;
    Ok(stream)
}

fn log_stream_error(e: cpal::StreamError) {
    error!("input stream error: {e}");
}

fn device_error(e: impl std::fmt::Display) -> CaptureError {
    CaptureError::Device(e.to_string())
}
