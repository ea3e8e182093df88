pub mod method;
pub mod response;

pub use method::{only, MethodNotAllowed};
pub use response::{ApiResponse, ApiResult};
