//! Entity definitions for Fieldserve
//!
//! This crate contains Sea-ORM entity definitions for the database models.

pub mod customers;
pub use customers::Entity as Customers;
pub mod machines;
pub use machines::Entity as Machines;
pub mod notifications;
pub use notifications::Entity as Notifications;
pub mod points;
pub use points::Entity as Points;
pub mod reports;
pub use reports::Entity as Reports;
pub mod service_records;
pub use service_records::Entity as ServiceRecords;
pub mod spares_quotations;
pub use spares_quotations::Entity as SparesQuotations;
pub mod users;
pub use users::Entity as Users;
