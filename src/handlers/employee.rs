use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::models::employee::EmployeeInput;
use crate::repository::employee::{CreatedEmployee, EmployeeRepository};
use crate::utils;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
pub struct FetchEmployeesQuery {
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

#[derive(Deserialize)]
pub struct GetEmployeeQuery {
    id: Option<String>,
}

#[derive(Serialize)]
struct CreateEmployeesResponse {
    message: String,
    results: Vec<CreatedEmployee>,
}

pub async fn save_employees(
    repo: web::Data<EmployeeRepository>,
    employees: web::Json<Vec<EmployeeInput>>,
) -> Result<HttpResponse, actix_web::Error> {
    // The whole batch is checked before any unit is written.
    for employee in employees.iter() {
        utils::validation::validate_payload(employee)?;
    }

    let results = repo.create_employees_with_contacts(&employees).await?;

    Ok(HttpResponse::Created().json(CreateEmployeesResponse {
        message: "Employees and contacts created successfully".to_string(),
        results,
    }))
}

pub async fn fetch_employees(
    repo: web::Data<EmployeeRepository>,
    query: web::Query<FetchEmployeesQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let page = utils::query::positive_or(query.page.as_deref(), DEFAULT_PAGE);
    let page_size = utils::query::positive_or(query.page_size.as_deref(), DEFAULT_PAGE_SIZE);

    let names = repo.list_employees(page, page_size).await?;

    Ok(HttpResponse::Ok().json(names))
}

pub async fn update_employee(
    repo: web::Data<EmployeeRepository>,
    id: web::Path<i64>,
    data: web::Json<EmployeeInput>,
) -> Result<HttpResponse, actix_web::Error> {
    utils::validation::validate_payload(&*data)?;

    repo.update_employee_with_contacts(id.into_inner(), &data).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee and contact details updated successfully",
    })))
}

pub async fn delete_employees(
    req: HttpRequest,
    repo: web::Data<EmployeeRepository>,
) -> Result<HttpResponse, actix_web::Error> {
    let ids = utils::query::parse_ids(req.query_string()).map_err(AppError::BadRequest)?;

    repo.delete_employees(&ids).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employees and contact details deleted successfully",
    })))
}

pub async fn get_employee(
    repo: web::Data<EmployeeRepository>,
    query: web::Query<GetEmployeeQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let raw_id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing employee ID in query parameters".to_string()))?;

    let id = raw_id
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid employee ID: {}", raw_id)))?;

    let employee = repo.get_employee_with_contacts(id).await?;

    Ok(HttpResponse::Ok().json(employee))
}
