use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::audio_toolkit::audio::{
    AudioChunk, AudioInput, CaptureConstraints, CaptureStream, RecordingArtifact,
    DEFAULT_MIME_TYPE,
};
use crate::error::CaptureError;

/// The state of one audio capture cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Stopped,
}

/// Owns the microphone for one recording cycle.
///
/// Exactly one cycle per manager: Idle → Recording on [`start`], Recording
/// → Stopped on [`stop`], and Stopped is terminal — the practice session
/// creates a fresh manager for every answer. The device stream is released
/// on every exit path, including discard and zero-chunk recordings.
///
/// [`start`]: AudioCaptureManager::start
/// [`stop`]: AudioCaptureManager::stop
pub struct AudioCaptureManager {
    input: Arc<dyn AudioInput>,
    state: RecordingState,
    stream: Option<Box<dyn CaptureStream>>,
    chunks: Option<mpsc::UnboundedReceiver<AudioChunk>>,
}

impl AudioCaptureManager {
    pub fn new(input: Arc<dyn AudioInput>) -> Self {
        Self {
            input,
            state: RecordingState::Idle,
            stream: None,
            chunks: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Acquires a fresh device stream and starts buffering chunks.
    ///
    /// Re-entrant while Recording: a second call returns immediately
    /// without opening another stream. Fails with [`CaptureError::Device`]
    /// when microphone access is denied or no input device exists, and
    /// with [`CaptureError::Finalized`] once the cycle has stopped.
    pub async fn start(&mut self, constraints: &CaptureConstraints) -> Result<(), CaptureError> {
        match self.state {
            RecordingState::Recording => {
                debug!("start() while recording, keeping the existing stream");
                Ok(())
            }
            RecordingState::Stopped => Err(CaptureError::Finalized),
            RecordingState::Idle => {
                let (stream, chunks) = self.input.open(constraints).await?;
                self.stream = Some(stream);
                self.chunks = Some(chunks);
                self.state = RecordingState::Recording;
                debug!("recording started");
                Ok(())
            }
        }
    }

    /// Stops the recording and assembles the [`RecordingArtifact`].
    ///
    /// Signals the stream to finalize, drains every chunk emitted before
    /// the chunk channel closed (receipt order) and concatenates them.
    /// The device is released unconditionally; a finalization error is
    /// logged, not propagated, and the artifact is still assembled. A
    /// recording with zero chunks yields a valid empty artifact carrying
    /// [`DEFAULT_MIME_TYPE`].
    pub async fn stop(&mut self) -> Result<RecordingArtifact, CaptureError> {
        match self.state {
            RecordingState::Idle => return Err(CaptureError::NotStarted),
            RecordingState::Stopped => return Err(CaptureError::NotRecording),
            RecordingState::Recording => {}
        }

        let finalize_result = match self.stream.as_mut() {
            Some(stream) => stream.finalize().await,
            None => Ok(()),
        };

        let mut data = Vec::new();
        let mut first_mime: Option<String> = None;
        if let Some(mut chunks) = self.chunks.take() {
            // The channel closes strictly after the last emitted chunk, so
            // draining to None observes the complete recording.
            while let Some(chunk) = chunks.recv().await {
                if first_mime.is_none() {
                    first_mime = Some(chunk.mime_type.clone());
                }
                data.extend_from_slice(&chunk.data);
            }
        }

        self.stream = None;
        self.state = RecordingState::Stopped;

        if let Err(e) = finalize_result {
            warn!("recorder finalization reported an error: {e}");
        }

        let mime_type = first_mime
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        debug!("recording stopped, {} bytes ({})", data.len(), mime_type);
        Ok(RecordingArtifact { data, mime_type })
    }

    /// Discards a live recording, releasing the device without assembling
    /// an artifact. No-op in any other state.
    pub async fn discard(&mut self) {
        if self.state != RecordingState::Recording {
            return;
        }
        if let Some(stream) = self.stream.as_mut() {
            if let Err(e) = stream.finalize().await {
                warn!("recorder finalization reported an error on discard: {e}");
            }
        }
        self.stream = None;
        self.chunks = None;
        self.state = RecordingState::Stopped;
        debug!("recording discarded");
    }
}
