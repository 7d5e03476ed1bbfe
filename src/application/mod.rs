// Application layer - the operations the chat surface invokes, plus the
// error taxonomy they report.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
