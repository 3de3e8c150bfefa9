//! Kitchen Quest — narration.
//!
//! Every CDM line goes through [`NarrationCoordinator::narrate`]: it is
//! logged, and when asked to speak outside presentation mode it is
//! synthesised and played on the single shared speaker. A newer spoken
//! line always preempts the one playing.

pub mod audio_resource;
pub mod coordinator;
pub mod error;
pub mod log;
pub mod pcm;
pub mod request;

pub use audio_resource::AudioResource;
pub use coordinator::NarrationCoordinator;
pub use error::NarrationError;
pub use log::TracingNarrationLog;
pub use pcm::PcmFormat;
pub use request::{NarrationOutcome, NarrationRequest, PresentationMode};
