pub mod controller;
pub mod form;
pub mod ipc;
pub mod store;
