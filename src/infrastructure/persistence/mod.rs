pub mod fs_store;
pub mod memory_store;
pub mod model_repository;
pub mod prediction_repository;

pub use fs_store::FsObjectStore;
pub use memory_store::InMemoryObjectStore;
pub use model_repository::ModelRepository;
pub use prediction_repository::PredictionRepository;
