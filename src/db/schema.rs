//! Initial schema and demo data.

use rust_decimal::Decimal;
use sqlx::PgPool;

const CREATE_EMPLOYEE: &str = r#"
CREATE TABLE IF NOT EXISTS employee (
    id BIGSERIAL PRIMARY KEY,
    first_name VARCHAR(50),
    last_name VARCHAR(50),
    email VARCHAR(100),
    hire_date DATE,
    salary NUMERIC(10, 2),
    job_title VARCHAR(50)
)
"#;

const CREATE_CONTACT_DETAILS: &str = r#"
CREATE TABLE IF NOT EXISTS contact_details (
    id BIGSERIAL PRIMARY KEY,
    employee_id BIGINT REFERENCES employee (id),
    phone_number VARCHAR(15),
    address VARCHAR(100),
    city VARCHAR(20),
    state VARCHAR(10),
    relationship VARCHAR(10)
)
"#;

/// (first_name, last_name, hire_date, salary in whole units, job_title)
const DEMO_EMPLOYEES: &[(&str, &str, &str, i64, &str)] = &[
    ("Ada", "Moreno", "2022-01-15", 60000, "HR"),
    ("Ben", "Okafor", "2021-08-20", 55000, "Sales"),
    ("Chloe", "Varga", "2020-03-10", 70000, "Engineering"),
    ("Dev", "Patel", "2019-06-05", 75000, "Marketing"),
    ("Elena", "Kowalski", "2018-05-12", 65000, "IT"),
    ("Farid", "Haddad", "2017-04-09", 60000, "Sales"),
    ("Grace", "Lindqvist", "2016-03-07", 72000, "Engineering"),
    ("Hiro", "Tanaka", "2015-02-03", 73000, "Marketing"),
    ("Ines", "Duarte", "2014-01-01", 67000, "IT"),
    ("Jonas", "Becker", "2013-12-29", 59000, "HR"),
    ("Keira", "Walsh", "2012-11-25", 71000, "Sales"),
    ("Luca", "Romano", "2011-10-21", 73000, "Engineering"),
];

/// Creates both tables when they do not exist yet.
pub async fn bootstrap(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in [CREATE_EMPLOYEE, CREATE_CONTACT_DETAILS] {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("Schema bootstrap complete");
    Ok(())
}

/// Inserts the demo employees into an empty employee table. Returns the rows inserted.
pub async fn seed(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        log::info!("Employee table already has {} rows, skipping seed", existing);
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for (first_name, last_name, hire_date, salary, job_title) in DEMO_EMPLOYEES {
        let email = format!("{}.{}@example.com", first_name, last_name).to_lowercase();
        let result = sqlx::query(
            r#"
            INSERT INTO employee (first_name, last_name, email, hire_date, salary, job_title)
            VALUES ($1, $2, $3, $4::DATE, $5, $6)
            "#,
        )
        .bind(*first_name)
        .bind(*last_name)
        .bind(email)
        .bind(*hire_date)
        .bind(Decimal::from(*salary))
        .bind(*job_title)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;

    log::info!("Seeded {} employees", inserted);
    Ok(inserted)
}
