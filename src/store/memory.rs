//! In-memory store used by the test suites.
//!
//! Transactions stage their writes against a private snapshot and replay them on
//! the shared tables at commit, so concurrent units behave like independent
//! database transactions. Foreign keys and the schema's column widths are enforced.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::{Store, StoreError, StoreTx};
use crate::models::contact::{Contact, ContactInput};
use crate::models::employee::{Employee, EmployeeInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InsertEmployee,
    InsertContacts,
    UpdateEmployee,
    DeleteContacts,
    DeleteEmployees,
    Read,
}

#[derive(Default, Clone)]
struct Tables {
    employees: BTreeMap<i64, Employee>,
    contacts: BTreeMap<i64, Contact>,
}

#[derive(Clone)]
enum Mutation {
    InsertEmployee(Employee),
    InsertContacts(Vec<Contact>),
    UpdateEmployee(i64, EmployeeInput),
    DeleteContacts(Vec<i64>),
    DeleteEmployees(Vec<i64>),
}

struct Shared {
    tables: Mutex<Tables>,
    next_employee_id: AtomicI64,
    next_contact_id: AtomicI64,
    failing: Mutex<HashSet<Operation>>,
}

#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                tables: Mutex::new(Tables::default()),
                next_employee_id: AtomicI64::new(1),
                next_contact_id: AtomicI64::new(1),
                failing: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Makes every subsequent `op` fail until [`MemoryStore::recover`] is called.
    pub fn fail_on(&self, op: Operation) {
        self.shared.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self) {
        self.shared.failing.lock().unwrap().clear();
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.shared.tables.lock().unwrap().employees.values().cloned().collect()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.shared.tables.lock().unwrap().contacts.values().cloned().collect()
    }

    fn check(&self, op: Operation) -> Result<(), StoreError> {
        if self.shared.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Rejected(format!("injected failure on {:?}", op)));
        }
        Ok(())
    }
}

/// Same text as `CONCAT(first_name, ' ', last_name)`, where NULL reads as empty.
fn display_name(employee: &Employee) -> String {
    format!(
        "{} {}",
        employee.first_name.as_deref().unwrap_or_default(),
        employee.last_name.as_deref().unwrap_or_default()
    )
}

fn check_width(column: &str, value: &Option<String>, max: usize) -> Result<(), StoreError> {
    match value {
        Some(v) if v.chars().count() > max => Err(StoreError::Rejected(format!(
            "value too long for column {} ({} > {})",
            column,
            v.chars().count(),
            max
        ))),
        _ => Ok(()),
    }
}

fn check_employee(employee: &EmployeeInput) -> Result<(), StoreError> {
    check_width("first_name", &employee.first_name, 50)?;
    check_width("last_name", &employee.last_name, 50)?;
    check_width("email", &employee.email, 100)?;
    check_width("job_title", &employee.job_title, 50)
}

fn check_contact(contact: &Contact) -> Result<(), StoreError> {
    check_width("phone_number", &contact.phone_number, 15)?;
    check_width("address", &contact.address, 100)?;
    check_width("city", &contact.city, 20)?;
    check_width("state", &contact.state, 10)?;
    check_width("relationship", &contact.relationship, 10)
}

fn apply(tables: &mut Tables, mutation: &Mutation) -> Result<u64, StoreError> {
    match mutation {
        Mutation::InsertEmployee(employee) => {
            tables.employees.insert(employee.id, employee.clone());
            Ok(1)
        }
        Mutation::InsertContacts(contacts) => {
            for contact in contacts {
                if !tables.employees.contains_key(&contact.employee_id) {
                    return Err(StoreError::Rejected(format!(
                        "foreign key violation: employee {} does not exist",
                        contact.employee_id
                    )));
                }
                check_contact(contact)?;
            }
            for contact in contacts {
                tables.contacts.insert(contact.id, contact.clone());
            }
            Ok(contacts.len() as u64)
        }
        Mutation::UpdateEmployee(id, input) => match tables.employees.get_mut(id) {
            Some(employee) => {
                employee.first_name = input.first_name.clone();
                employee.last_name = input.last_name.clone();
                employee.email = input.email.clone();
                employee.hire_date = input.hire_date;
                employee.salary = input.salary;
                employee.job_title = input.job_title.clone();
                Ok(1)
            }
            None => Ok(0),
        },
        Mutation::DeleteContacts(employee_ids) => {
            let before = tables.contacts.len();
            tables
                .contacts
                .retain(|_, contact| !employee_ids.contains(&contact.employee_id));
            Ok((before - tables.contacts.len()) as u64)
        }
        Mutation::DeleteEmployees(ids) => {
            if let Some(contact) = tables
                .contacts
                .values()
                .find(|contact| ids.contains(&contact.employee_id))
            {
                return Err(StoreError::Rejected(format!(
                    "foreign key violation: contact {} still references employee {}",
                    contact.id, contact.employee_id
                )));
            }
            let before = tables.employees.len();
            tables.employees.retain(|id, _| !ids.contains(id));
            Ok((before - tables.employees.len()) as u64)
        }
    }
}

pub struct MemoryTx {
    store: MemoryStore,
    view: Tables,
    log: Vec<Mutation>,
}

impl MemoryTx {
    fn stage(&mut self, mutation: Mutation) -> Result<u64, StoreError> {
        let affected = apply(&mut self.view, &mutation)?;
        self.log.push(mutation);
        Ok(affected)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let view = self.shared.tables.lock().unwrap().clone();
        Ok(Box::new(MemoryTx {
            store: self.clone(),
            view,
            log: Vec::new(),
        }))
    }

    async fn employee_names(&self, limit: i64, offset: i64) -> Result<Vec<String>, StoreError> {
        self.check(Operation::Read)?;
        let tables = self.shared.tables.lock().unwrap();
        Ok(tables
            .employees
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(display_name)
            .collect())
    }

    async fn find_employee(&self, id: i64) -> Result<Option<Employee>, StoreError> {
        self.check(Operation::Read)?;
        Ok(self.shared.tables.lock().unwrap().employees.get(&id).cloned())
    }

    async fn contacts_for(&self, employee_id: i64) -> Result<Vec<Contact>, StoreError> {
        self.check(Operation::Read)?;
        let tables = self.shared.tables.lock().unwrap();
        Ok(tables
            .contacts
            .values()
            .filter(|contact| contact.employee_id == employee_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn insert_employee(&mut self, employee: &EmployeeInput) -> Result<i64, StoreError> {
        self.store.check(Operation::InsertEmployee)?;
        check_employee(employee)?;
        let id = self.store.shared.next_employee_id.fetch_add(1, Ordering::SeqCst);
        self.stage(Mutation::InsertEmployee(Employee {
            id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            hire_date: employee.hire_date,
            salary: employee.salary,
            job_title: employee.job_title.clone(),
        }))?;
        Ok(id)
    }

    async fn insert_contacts(
        &mut self,
        employee_id: i64,
        contacts: &[ContactInput],
    ) -> Result<u64, StoreError> {
        self.store.check(Operation::InsertContacts)?;
        let rows = contacts
            .iter()
            .map(|contact| Contact {
                id: self.store.shared.next_contact_id.fetch_add(1, Ordering::SeqCst),
                employee_id,
                phone_number: Some(contact.phone_number.clone()),
                address: Some(contact.address.clone()),
                city: contact.city.clone(),
                state: contact.state.clone(),
                relationship: contact.relationship.clone(),
            })
            .collect();
        self.stage(Mutation::InsertContacts(rows))
    }

    async fn update_employee(&mut self, id: i64, employee: &EmployeeInput) -> Result<u64, StoreError> {
        self.store.check(Operation::UpdateEmployee)?;
        check_employee(employee)?;
        self.stage(Mutation::UpdateEmployee(id, employee.clone()))
    }

    async fn delete_contacts(&mut self, employee_ids: &[i64]) -> Result<u64, StoreError> {
        self.store.check(Operation::DeleteContacts)?;
        self.stage(Mutation::DeleteContacts(employee_ids.to_vec()))
    }

    async fn delete_employees(&mut self, ids: &[i64]) -> Result<u64, StoreError> {
        self.store.check(Operation::DeleteEmployees)?;
        self.stage(Mutation::DeleteEmployees(ids.to_vec()))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut tables = self.store.shared.tables.lock().unwrap();
        let mut next = tables.clone();
        for mutation in &self.log {
            apply(&mut next, mutation)?;
        }
        *tables = next;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(phone: &str) -> ContactInput {
        ContactInput {
            phone_number: phone.to_string(),
            address: "1 Main St".to_string(),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn uncommitted_writes_are_invisible() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.insert_employee(&EmployeeInput::default()).await.unwrap();
        tx.insert_contacts(id, &[contact("555")]).await.unwrap();
        assert!(store.employees().is_empty());

        tx.rollback().await.unwrap();
        assert!(store.employees().is_empty());
        assert!(store.contacts().is_empty());
    }

    #[actix_web::test]
    async fn contacts_require_an_existing_employee() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let err = tx.insert_contacts(42, &[contact("555")]).await.unwrap_err();
        assert!(err.to_string().contains("foreign key"));
    }

    #[actix_web::test]
    async fn employee_with_contacts_cannot_be_deleted_first() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.insert_employee(&EmployeeInput::default()).await.unwrap();
        tx.insert_contacts(id, &[contact("555")]).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert!(tx.delete_employees(&[id]).await.is_err());
    }

    #[actix_web::test]
    async fn phone_number_width_is_enforced() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.insert_employee(&EmployeeInput::default()).await.unwrap();
        assert!(tx
            .insert_contacts(id, &[contact("0123456789012345")])
            .await
            .is_err());
    }
}
