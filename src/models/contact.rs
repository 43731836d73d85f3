use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub employee_id: i64,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
pub struct ContactInput {
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub relationship: Option<String>,
}
