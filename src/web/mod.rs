pub mod api;
pub mod pages;
pub mod views;

pub use api::*;
pub use pages::*;
