// Service exports
pub mod match_service;
pub mod postgres;
pub mod store;

pub use match_service::{
    BulkPlan, MatchOptions, MatchService, Recommendation, ServiceError, SubjectRef,
};
pub use postgres::PostgresStore;
pub use store::{InMemoryStore, MemberStore, Presentation, StoreError};
