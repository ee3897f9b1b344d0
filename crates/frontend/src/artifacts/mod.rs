pub mod filing;
pub mod list;
pub mod panel;
pub mod store;
pub mod table;
