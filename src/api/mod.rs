pub mod services;

pub use services::api_routes;
