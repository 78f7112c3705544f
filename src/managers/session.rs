use log::{debug, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::audio_toolkit::audio::{AudioInput, CaptureConstraints, RecordingArtifact};
use crate::audio_toolkit::speech::SpeechCapability;
use crate::audio_toolkit::text::{correct_vocabulary, similarity};
use crate::error::SessionError;
use crate::managers::capture::{AudioCaptureManager, RecordingState};
use crate::managers::speech::SpeechFallbackManager;
use crate::questions::Question;
use crate::settings::AppSettings;

/// The interaction state of a practice session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Answering,
    Evaluated,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Ready => "Ready",
            SessionState::Answering => "Answering",
            SessionState::Evaluated => "Evaluated",
        }
    }
}

/// One learner attempt at answering a question aloud.
///
/// Ephemeral by contract: discarded on [`PracticeSession::reset`], nothing
/// is persisted.
#[derive(Debug, Clone)]
pub struct PracticeAttempt {
    pub question: Question,
    pub artifact: Option<RecordingArtifact>,
    pub transcript: String,
    pub score: Option<f64>,
}

/// Orchestrates one question-answer-evaluate loop: Ready → Answering →
/// Evaluated, with [`reset`](PracticeSession::reset) as the escape hatch
/// back to Ready from anywhere.
///
/// Capture and recognition run concurrently during the answering window
/// and are not synchronized with each other: recognition is advisory and
/// may finish before or after the recording stops.
pub struct PracticeSession {
    input: Arc<dyn AudioInput>,
    speech: SpeechFallbackManager,
    settings: AppSettings,
    state: SessionState,
    capture: Option<AudioCaptureManager>,
    attempt: Option<PracticeAttempt>,
    speech_task: Option<JoinHandle<String>>,
    cancel: Option<CancellationToken>,
}

impl PracticeSession {
    pub fn new(
        input: Arc<dyn AudioInput>,
        capability: Arc<dyn SpeechCapability>,
        settings: AppSettings,
    ) -> Self {
        let speech =
            SpeechFallbackManager::new(capability, settings.recognition_language.clone());
        Self {
            input,
            speech,
            settings,
            state: SessionState::Ready,
            capture: None,
            attempt: None,
            speech_task: None,
            cancel: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Recording state of the current capture cycle, for live display.
    pub fn recording_state(&self) -> RecordingState {
        self.capture
            .as_ref()
            .map(|c| c.state())
            .unwrap_or(RecordingState::Idle)
    }

    /// Text recognized so far in the current answering window.
    pub fn live_transcript(&self) -> String {
        self.speech.live_transcript()
    }

    pub fn attempt(&self) -> Option<&PracticeAttempt> {
        self.attempt.as_ref()
    }

    /// Starts answering `question`: acquires the microphone and, when the
    /// platform supports it, kicks off recognition concurrently.
    ///
    /// Valid from Ready or Evaluated. A device failure aborts the
    /// transition — the session keeps its previous state and the learner
    /// may retry.
    pub async fn begin(&mut self, question: Question) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Ready | SessionState::Evaluated) {
            return Err(self.invalid("begin"));
        }

        let mut capture = AudioCaptureManager::new(self.input.clone());
        let constraints = CaptureConstraints {
            device: self.settings.selected_microphone.clone(),
        };
        capture.start(&constraints).await?;

        let cancel = CancellationToken::new();
        self.speech_task = if self.speech.is_supported() {
            let speech = self.speech.clone();
            let timeout = self.settings.speech_timeout();
            let token = cancel.clone();
            Some(tokio::spawn(
                async move { speech.transcribe(timeout, token).await },
            ))
        } else {
            None
        };
        self.cancel = Some(cancel);
        self.capture = Some(capture);
        self.attempt = Some(PracticeAttempt {
            question,
            artifact: None,
            transcript: String::new(),
            score: None,
        });
        self.state = SessionState::Answering;
        debug!("practice attempt started");
        Ok(())
    }

    /// Finishes the attempt: stops the recording, resolves the transcript
    /// (bounded by the recognition timeout; immediate when unsupported),
    /// scores it against the question's reference text and returns the
    /// completed attempt.
    pub async fn end(&mut self) -> Result<PracticeAttempt, SessionError> {
        if self.state != SessionState::Answering {
            return Err(self.invalid("end"));
        }
        let Some(capture) = self.capture.as_mut() else {
            return Err(self.invalid("end"));
        };

        let artifact = capture.stop().await?;

        let raw_transcript = match self.speech_task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                warn!("recognition task failed: {e}");
                String::new()
            }),
            None => String::new(),
        };
        self.cancel = None;

        let transcript = correct_vocabulary(
            &raw_transcript,
            &self.settings.custom_words,
            self.settings.custom_word_threshold,
        );

        let Some(attempt) = self.attempt.as_mut() else {
            return Err(SessionError::InvalidState {
                op: "end",
                state: "Answering",
            });
        };
        let score = similarity(&transcript, attempt.question.reference_text());
        attempt.artifact = Some(artifact);
        attempt.transcript = transcript;
        attempt.score = Some(score);
        self.state = SessionState::Evaluated;
        debug!("attempt evaluated, score {score:.3}");
        Ok(attempt.clone())
    }

    /// Discards the current attempt and returns to Ready. Cancels any live
    /// recognition and releases a live microphone. Always succeeds, from
    /// any state.
    pub async fn reset(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        // The cancelled task aborts its recognizer on its next poll.
        self.speech_task = None;
        if let Some(capture) = self.capture.as_mut() {
            capture.discard().await;
        }
        self.capture = None;
        self.attempt = None;
        self.state = SessionState::Ready;
        debug!("session reset");
    }

    fn invalid(&self, op: &'static str) -> SessionError {
        SessionError::InvalidState {
            op,
            state: self.state.name(),
        }
    }
}
