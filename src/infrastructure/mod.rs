pub mod database;
pub mod entities;
pub mod repositories;
pub mod schema;
pub mod traits;
