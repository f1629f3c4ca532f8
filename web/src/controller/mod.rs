pub mod auth_controller;
pub mod health_check_controller;
pub mod page_controller;
