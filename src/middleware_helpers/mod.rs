pub mod api_token;
pub mod request_id;

pub use api_token::require_api_token;
pub use request_id::request_id_middleware;
