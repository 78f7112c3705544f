pub mod capture;
pub mod session;
pub mod speech;

pub use capture::{AudioCaptureManager, RecordingState};
pub use session::{PracticeAttempt, PracticeSession, SessionState};
pub use speech::SpeechFallbackManager;
