pub mod auth_service;
pub mod menu_service;
pub mod message_service;
pub mod order_number;
pub mod order_service;
pub mod pricing;
pub mod settings_service;
pub mod validation;
