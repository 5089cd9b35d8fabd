pub mod audit_logs;
pub mod categories;
pub mod menu_items;
pub mod messages;
pub mod order_items;
pub mod orders;
pub mod settings;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use menu_items::Entity as MenuItems;
pub use messages::Entity as Messages;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
