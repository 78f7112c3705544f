pub mod audio;
pub mod speech;
pub mod text;

pub use audio::{
    list_input_devices, save_artifact_wav, AudioChunk, AudioInput, CaptureConstraints,
    CaptureStream, CpalDeviceInfo, CpalInput, RecordingArtifact, DEFAULT_MIME_TYPE,
};
pub use speech::{NoSpeechCapability, RecognizerEvent, SpeechCapability, SpeechRecognizer};
pub use text::{correct_vocabulary, similarity, tokenize, TermVector};
