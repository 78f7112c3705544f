use thiserror::Error;

/// Errors raised by the audio capture layer.
///
/// `Device` is fatal to the current attempt and should be surfaced to the
/// learner with a retry affordance. The remaining variants mark misuse of
/// the recording state machine and should never occur in a correct
/// integration.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Microphone access was denied or no input device exists.
    #[error("microphone unavailable: {0}")]
    Device(String),

    /// `stop()` was called on a capture cycle that was never started.
    #[error("recorder was never started")]
    NotStarted,

    /// `stop()` was called while not recording.
    #[error("recorder is not currently recording")]
    NotRecording,

    /// `start()` was called on an already-finalized capture cycle.
    /// Stopped is terminal; a new cycle needs a new capture manager.
    #[error("capture cycle already finalized")]
    Finalized,
}

/// Errors raised by the practice session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An operation was invoked in a state that does not permit it.
    #[error("{op}() is not valid in the {state} state")]
    InvalidState {
        op: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Errors raised while drawing a practice question.
#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("course has no modules")]
    NoModules,

    #[error("module has no questions")]
    NoQuestions,

    #[error("question source failed: {0}")]
    Source(#[from] anyhow::Error),
}
