// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{DashboardStats, ModelRecord, PurchaseRecord, UserRecord};
pub use requests::{
    CreateModelRequest, FindModelsQuery, ModelUpdate, RegisterUserRequest, SearchQuery,
};
pub use responses::{
    DashboardModel, ErrorResponse, HealthResponse, ProfileResponse, PurchaseResponse,
    RegisterUserResponse,
};
