pub mod application;
pub mod bot;
pub mod domain;
pub mod rates;
pub mod storage;

pub use application::{AppError, LedgerService};
pub use domain::*;
pub use storage::JsonStore;
