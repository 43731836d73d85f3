use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::contact::{Contact, ContactInput};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub job_title: Option<String>,
}

/// Request shape for both create and update. Scalar fields are written as given,
/// so an absent field is stored as NULL.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
pub struct EmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub job_title: Option<String>,
    #[validate]
    pub contacts: Vec<ContactInput>,
}

#[derive(Serialize, Debug)]
pub struct EmployeeWithContacts {
    pub employee: Employee,
    pub contacts: Vec<Contact>,
}
