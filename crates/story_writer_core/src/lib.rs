pub mod catalog;
pub mod domain;
pub mod export;
pub mod generation;
pub mod ports;
pub mod prompt;

pub use catalog::{LengthBucket, StoryCatalog};
pub use domain::{ExportFormat, StoryRecord, StoryRequest, StoryStats};
pub use generation::{StoryStream, StoryWriter, StreamState};
pub use ports::{
    FragmentStream, PortError, PortResult, StoryGenerationService, StoryRepository,
};
