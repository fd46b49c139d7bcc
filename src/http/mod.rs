pub mod errors;
mod handlers;
pub mod router;
pub mod state;

pub use errors::{ApiError, ProblemDetails, ProblemInvalidParam};
pub use router::{build_router, ApiServer};
pub use state::AppState;
