//! Voice practice answers, captured and scored.
//!
//! `viva` is the capture-and-evaluation core of an interview trainer: it
//! records a learner's spoken answer, attempts a best-effort transcript
//! through an optional platform recognizer bounded by a timeout, and
//! scores the transcript against the question's reference answer with a
//! deterministic lexical similarity metric.
//!
//! The platform recorder and recognizer sit behind small capability
//! traits ([`AudioInput`], [`SpeechCapability`]), so orchestration and
//! scoring are fully testable with fake adapters. A cpal-backed input is
//! bundled; an acoustic model is not — recognition degrades gracefully to
//! an empty transcript.

pub mod audio_toolkit;
pub mod error;
pub mod managers;
pub mod questions;
pub mod settings;

pub use audio_toolkit::audio::{
    list_input_devices, save_artifact_wav, AudioChunk, AudioInput, CaptureConstraints,
    CaptureStream, CpalInput, RecordingArtifact, DEFAULT_MIME_TYPE,
};
pub use audio_toolkit::speech::{
    NoSpeechCapability, RecognizerEvent, SpeechCapability, SpeechRecognizer,
};
pub use audio_toolkit::text::similarity;
pub use error::{CaptureError, QuestionError, SessionError};
pub use managers::{
    AudioCaptureManager, PracticeAttempt, PracticeSession, RecordingState, SessionState,
    SpeechFallbackManager,
};
pub use questions::{draw_question, Module, Question, QuestionSource};
pub use settings::{load_settings, save_settings, AppSettings};
