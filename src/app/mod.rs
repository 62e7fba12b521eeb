pub mod error;
pub mod portfolio_service;

pub use error::{ServiceError, ServiceResult};
pub use portfolio_service::{PortfolioService, UploadedFile};
