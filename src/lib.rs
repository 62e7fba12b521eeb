pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::PortfolioService;
pub use domain::model::{Info, Photo, Piece};
pub use infra::config::AppConfig;
pub use storage::{DocumentStore, FileStore, MemoryDocumentStore, PgDocumentStore};
