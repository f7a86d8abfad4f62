pub mod authorize;
pub mod response;

pub use authorize::{authorize, context_middleware, guarded, RequiredCapability};
pub use response::{ApiResponse, ApiResult};
