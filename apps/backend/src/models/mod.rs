pub mod api;
pub mod db;
pub mod domain;

pub use api::ApiResponse;
