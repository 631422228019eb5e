mod coordinator;
mod registry;
mod selection;
mod types;

pub use coordinator::{BatchOutcome, UploadCoordinator};
pub use registry::{FileRegistry, RegistrySummary};
pub use selection::SelectionPolicy;
pub use types::{FileEntry, FileHandle, ProcessingStatus};
