use tokio::sync::mpsc;

/// Events emitted by a live recognizer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// A recognition hypothesis. Only final results become transcript text;
    /// interim results are advisory.
    Result { text: String, is_final: bool },
    /// The recognizer failed. Recognition is best-effort, so the caller
    /// keeps whatever text was accumulated and moves on.
    Error(String),
    /// Natural end of recognition.
    End,
}

/// A live speech recognition session.
///
/// Implementations deliver events on the channel passed to [`start`]
/// (event-style callbacks) and stop delivering once [`abort`] returns.
/// Abort is cooperative: it requests release of the underlying resource
/// rather than guaranteeing an instantaneous stop.
///
/// [`start`]: SpeechRecognizer::start
/// [`abort`]: SpeechRecognizer::abort
pub trait SpeechRecognizer: Send {
    fn start(&mut self, events: mpsc::UnboundedSender<RecognizerEvent>) -> anyhow::Result<()>;
    fn abort(&mut self);
}

/// Capability probe for platform speech recognition.
pub trait SpeechCapability: Send + Sync {
    /// Whether the platform offers speech recognition at all.
    fn is_supported(&self) -> bool;

    /// Creates a recognizer for one live session, or `None` when the
    /// platform has no recognition capability.
    fn recognizer(&self, language: Option<&str>) -> Option<Box<dyn SpeechRecognizer>>;
}

/// The bundled platform answer: this crate ships no acoustic model, so
/// recognition is unsupported unless the embedder provides a capability.
#[derive(Debug, Clone, Default)]
pub struct NoSpeechCapability;

impl SpeechCapability for NoSpeechCapability {
    fn is_supported(&self) -> bool {
        false
    }

    fn recognizer(&self, _language: Option<&str>) -> Option<Box<dyn SpeechRecognizer>> {
        None
    }
}
