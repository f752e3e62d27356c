pub mod category_controller;

pub use category_controller::configure;
