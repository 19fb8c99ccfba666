pub mod error;
pub mod response;
pub mod time;

pub use error::AppError;
