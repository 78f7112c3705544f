use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::audio_toolkit::speech::{RecognizerEvent, SpeechCapability};

/// Best-effort live transcription bounded by a timeout.
///
/// Runs logically concurrently with audio capture; the caller decides when
/// to stop each side. Recognition failures never propagate — the
/// accumulated text (possibly empty) is always returned.
#[derive(Clone)]
pub struct SpeechFallbackManager {
    capability: Arc<dyn SpeechCapability>,
    language: Option<String>,
    live: Arc<Mutex<String>>,
}

impl SpeechFallbackManager {
    pub fn new(capability: Arc<dyn SpeechCapability>, language: Option<String>) -> Self {
        Self {
            capability,
            language,
            live: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Whether the platform offers speech recognition. `false` is a
    /// normal outcome: transcripts simply stay empty.
    pub fn is_supported(&self) -> bool {
        self.capability.is_supported()
    }

    /// The text accumulated by the current recognition session so far.
    pub fn live_transcript(&self) -> String {
        self.live.lock().unwrap().clone()
    }

    /// Runs one recognition session and returns its transcript.
    ///
    /// Accumulates final results in arrival order and resolves when the
    /// recognizer ends naturally, reports an error (partial text is kept,
    /// the error is only logged), the timeout elapses, or `cancel` fires.
    /// Timeout and cancellation actively abort the recognizer; no result
    /// is accepted after the abort. When a queued recognizer event and the
    /// timeout race in the same instant the event wins: the select is
    /// biased toward the event channel.
    pub async fn transcribe(&self, timeout: Duration, cancel: CancellationToken) -> String {
        let Some(mut recognizer) = self.capability.recognizer(self.language.as_deref()) else {
            debug!("speech recognition unsupported, skipping transcription");
            return String::new();
        };

        self.live.lock().unwrap().clear();

        let (events_tx, mut events) = mpsc::unbounded_channel();
        if let Err(e) = recognizer.start(events_tx) {
            debug!("recognizer failed to start: {e}");
            return String::new();
        }

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let mut transcript = String::new();
        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(RecognizerEvent::Result { text, is_final }) => {
                        if is_final {
                            transcript.push_str(&text);
                            self.live.lock().unwrap().push_str(&text);
                        }
                    }
                    Some(RecognizerEvent::Error(e)) => {
                        debug!("recognizer error, keeping partial transcript: {e}");
                        recognizer.abort();
                        break;
                    }
                    Some(RecognizerEvent::End) | None => break,
                },
                _ = cancel.cancelled() => {
                    debug!("recognition cancelled");
                    recognizer.abort();
                    break;
                }
                _ = &mut deadline => {
                    debug!("recognition timed out after {timeout:?}");
                    recognizer.abort();
                    break;
                }
            }
        }

        transcript
    }
}
