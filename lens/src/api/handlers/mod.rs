pub mod extract;
pub(crate) mod health;

pub use extract::extract_text;
pub use health::{health_check, service_info};
