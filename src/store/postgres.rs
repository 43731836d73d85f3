use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::{Store, StoreError, StoreTx};
use crate::models::contact::{Contact, ContactInput};
use crate::models::employee::{Employee, EmployeeInput};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn employee_names(&self, limit: i64, offset: i64) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT CONCAT(first_name, ' ', last_name) AS employee FROM employee LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn find_employee(&self, id: i64) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, hire_date, salary, job_title
            FROM employee
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn contacts_for(&self, employee_id: i64) -> Result<Vec<Contact>, StoreError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, employee_id, phone_number, address, city, state, relationship
            FROM contact_details
            WHERE employee_id = $1
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn insert_employee(&mut self, employee: &EmployeeInput) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employee (first_name, last_name, email, hire_date, salary, job_title)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(employee.hire_date)
        .bind(employee.salary)
        .bind(&employee.job_title)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn insert_contacts(
        &mut self,
        employee_id: i64,
        contacts: &[ContactInput],
    ) -> Result<u64, StoreError> {
        if contacts.is_empty() {
            return Ok(0);
        }

        let mut query_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO contact_details (employee_id, phone_number, address, city, state, relationship) ",
        );
        query_builder.push_values(contacts, |mut row, contact| {
            row.push_bind(employee_id)
                .push_bind(contact.phone_number.clone())
                .push_bind(contact.address.clone())
                .push_bind(contact.city.clone())
                .push_bind(contact.state.clone())
                .push_bind(contact.relationship.clone());
        });

        let result = query_builder.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn update_employee(&mut self, id: i64, employee: &EmployeeInput) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE employee
            SET first_name = $1, last_name = $2, email = $3, hire_date = $4, salary = $5, job_title = $6
            WHERE id = $7
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(employee.hire_date)
        .bind(employee.salary)
        .bind(&employee.job_title)
        .bind(id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_contacts(&mut self, employee_ids: &[i64]) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM contact_details WHERE employee_id = ANY($1)")
            .bind(employee_ids.to_vec())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_employees(&mut self, ids: &[i64]) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM employee WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
