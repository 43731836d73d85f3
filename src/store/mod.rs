//! Data store gateway.
//!
//! Repository code talks to the relational store only through [`Store`] and the
//! unit-of-work handle it hands out, [`StoreTx`]. Every value reaches the store
//! as a bound parameter.

use async_trait::async_trait;
use std::fmt;

use crate::models::contact::{Contact, ContactInput};
use crate::models::employee::{Employee, EmployeeInput};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    Sqlx(sqlx::Error),
    /// The store refused the statement (constraint or width violation).
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlx(err) => write!(f, "store error: {}", err),
            StoreError::Rejected(msg) => write!(f, "store rejected statement: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlx(err) => Some(err),
            StoreError::Rejected(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Sqlx(err)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Opens a unit of work. Dropping the handle without committing discards it.
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError>;

    /// `"first last"` strings in store order.
    async fn employee_names(&self, limit: i64, offset: i64) -> Result<Vec<String>, StoreError>;

    async fn find_employee(&self, id: i64) -> Result<Option<Employee>, StoreError>;

    async fn contacts_for(&self, employee_id: i64) -> Result<Vec<Contact>, StoreError>;
}

#[async_trait]
pub trait StoreTx: Send {
    /// Returns the generated employee id.
    async fn insert_employee(&mut self, employee: &EmployeeInput) -> Result<i64, StoreError>;

    async fn insert_contacts(
        &mut self,
        employee_id: i64,
        contacts: &[ContactInput],
    ) -> Result<u64, StoreError>;

    async fn update_employee(&mut self, id: i64, employee: &EmployeeInput) -> Result<u64, StoreError>;

    async fn delete_contacts(&mut self, employee_ids: &[i64]) -> Result<u64, StoreError>;

    async fn delete_employees(&mut self, ids: &[i64]) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
