use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::employee::{EmployeeInput, EmployeeWithContacts};
use crate::store::{Store, StoreError, StoreTx};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreatedEmployee {
    pub employee_id: i64,
    pub message: String,
}

/// Employee and contact_details operations. Every write runs as one store
/// transaction; a failed phase rolls back the phases before it.
#[derive(Clone)]
pub struct EmployeeRepository {
    store: Arc<dyn Store>,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates every unit concurrently, each in its own transaction. The batch
    /// waits for all units and fails if any one failed; units that succeeded
    /// stay committed.
    pub async fn create_employees_with_contacts(
        &self,
        employees: &[EmployeeInput],
    ) -> Result<Vec<CreatedEmployee>, AppError> {
        let outcomes = join_all(employees.iter().map(|employee| self.create_unit(employee))).await;

        let mut created = Vec::with_capacity(outcomes.len());
        let mut failures = 0;
        for outcome in outcomes {
            match outcome {
                Ok(employee_id) => created.push(CreatedEmployee {
                    employee_id,
                    message: format!(
                        "Employee and contacts created successfully (Employee ID: {})",
                        employee_id
                    ),
                }),
                Err(err) => {
                    log::error!("Employee unit failed: {}", err);
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            log::warn!(
                "Batch create failed for {} of {} employees; {} committed",
                failures,
                employees.len(),
                created.len()
            );
            return Err(AppError::DatabaseError(
                "Unable to create employees and contacts".to_string(),
            ));
        }

        Ok(created)
    }

    async fn create_unit(&self, employee: &EmployeeInput) -> Result<i64, StoreError> {
        let mut tx = self.store.begin().await?;
        let outcome = Self::write_unit(tx.as_mut(), employee).await;
        finish(tx, outcome).await
    }

    async fn write_unit(tx: &mut dyn StoreTx, employee: &EmployeeInput) -> Result<i64, StoreError> {
        let employee_id = tx.insert_employee(employee).await?;
        tx.insert_contacts(employee_id, &employee.contacts).await?;
        log::debug!(
            "Inserted employee {} with {} contacts",
            employee_id,
            employee.contacts.len()
        );
        Ok(employee_id)
    }

    pub async fn list_employees(&self, page: i64, page_size: i64) -> Result<Vec<String>, AppError> {
        // Pages past the end read as empty rather than overflowing.
        let offset = (page - 1).saturating_mul(page_size);
        self.store
            .employee_names(page_size, offset)
            .await
            .map_err(|err| AppError::store("Unable to retrieve employees", err))
    }

    pub async fn get_employee_with_contacts(&self, id: i64) -> Result<EmployeeWithContacts, AppError> {
        let employee = self
            .store
            .find_employee(id)
            .await
            .map_err(|err| AppError::store("Unable to retrieve employee details", err))?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        let contacts = self
            .store
            .contacts_for(id)
            .await
            .map_err(|err| AppError::store("Unable to retrieve contact details", err))?;

        Ok(EmployeeWithContacts { employee, contacts })
    }

    /// Update scalars, then delete the old contacts, then insert the new set.
    pub async fn update_employee_with_contacts(
        &self,
        id: i64,
        data: &EmployeeInput,
    ) -> Result<(), AppError> {
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|err| AppError::store("Unable to update employee data", err))?;

        let outcome = Self::write_update(tx.as_mut(), id, data).await;
        let (message, outcome) = match outcome {
            Ok(()) => ("Unable to update contact details", Ok(())),
            Err((message, err)) => (message, Err(err)),
        };
        finish(tx, outcome)
            .await
            .map_err(|err| AppError::store(message, err))
    }

    async fn write_update(
        tx: &mut dyn StoreTx,
        id: i64,
        data: &EmployeeInput,
    ) -> Result<(), (&'static str, StoreError)> {
        let updated = tx
            .update_employee(id, data)
            .await
            .map_err(|err| ("Unable to update employee data", err))?;
        let removed = tx
            .delete_contacts(&[id])
            .await
            .map_err(|err| ("Unable to update contact details", err))?;
        let inserted = tx
            .insert_contacts(id, &data.contacts)
            .await
            .map_err(|err| ("Unable to update contact details", err))?;
        log::debug!(
            "Employee {}: {} row updated, {} contacts replaced by {}",
            id,
            updated,
            removed,
            inserted
        );
        Ok(())
    }

    /// Deletes contacts first, then the employees. Ids that match nothing are ignored.
    pub async fn delete_employees(&self, ids: &[i64]) -> Result<(), AppError> {
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|err| AppError::store("Unable to delete contact details", err))?;

        let outcome = Self::write_delete(tx.as_mut(), ids).await;
        let (message, outcome) = match outcome {
            Ok(()) => ("Unable to delete employees", Ok(())),
            Err((message, err)) => (message, Err(err)),
        };
        finish(tx, outcome)
            .await
            .map_err(|err| AppError::store(message, err))
    }

    async fn write_delete(tx: &mut dyn StoreTx, ids: &[i64]) -> Result<(), (&'static str, StoreError)> {
        let contacts = tx
            .delete_contacts(ids)
            .await
            .map_err(|err| ("Unable to delete contact details", err))?;
        let employees = tx
            .delete_employees(ids)
            .await
            .map_err(|err| ("Unable to delete employees", err))?;
        log::info!(
            "Deleted {} employees and {} contacts for ids {:?}",
            employees,
            contacts,
            ids
        );
        Ok(())
    }
}

/// Commits on success, rolls back on failure. The phase error wins over a rollback error.
async fn finish<T>(tx: Box<dyn StoreTx>, outcome: Result<T, StoreError>) -> Result<T, StoreError> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                log::error!("Rollback failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}
