pub mod contact;
pub mod employee;
