pub mod services;
pub mod traits;
pub mod uploads;
pub mod validation;
