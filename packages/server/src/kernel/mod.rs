// Infrastructure services shared across domains

pub mod storage;

pub use storage::StorageClient;
