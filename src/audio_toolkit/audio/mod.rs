// Re-export all audio components
pub mod device;
pub mod recorder;
pub mod utils;

pub use device::{list_input_devices, CpalDeviceInfo};
pub use recorder::{
    AudioChunk, AudioInput, CaptureConstraints, CaptureStream, CpalInput, RecordingArtifact,
    DEFAULT_MIME_TYPE,
};
pub use utils::save_artifact_wav;
