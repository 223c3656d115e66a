pub mod auth;
pub mod http_client_factory;
pub mod instrumentation;

pub use auth::BearerAuthMiddleware;
pub use http_client_factory::HttpClientFactory;
pub use instrumentation::InstrumentationMiddleware;
