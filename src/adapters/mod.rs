// Adapters layer: concrete implementations of the domain ports (storage, snapshot sources).

pub mod file_source;
pub mod rest_source;
pub mod storage;

pub use file_source::FileSnapshotSource;
pub use rest_source::RestSnapshotSource;
pub use storage::LocalStorage;
