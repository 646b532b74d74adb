//! Sample organization for `roster init --seed`
//!
//! Rows go through the [`Catalog`] like any interactive write, so the same
//! foreign keys and bound parameters apply.

use tracing::info;

use crate::engine::Catalog;
use crate::error::Result;
use crate::model::{NewEmployee, NewRole};

const DEPARTMENTS: [&str; 4] = ["Engineering", "Finance", "Legal", "Sales"];

/// (title, salary, index into `DEPARTMENTS`)
const ROLES: [(&str, i64, usize); 8] = [
    ("Lead Engineer", 150_000, 0),
    ("Software Engineer", 120_000, 0),
    ("Account Manager", 160_000, 1),
    ("Accountant", 125_000, 1),
    ("Legal Team Lead", 250_000, 2),
    ("Lawyer", 190_000, 2),
    ("Sales Lead", 100_000, 3),
    ("Salesperson", 80_000, 3),
];

/// (first name, last name, index into `ROLES`, index of manager in this list)
const EMPLOYEES: [(&str, &str, usize, Option<usize>); 8] = [
    ("John", "Doe", 6, None),
    ("Mike", "Chan", 7, Some(0)),
    ("Ashley", "Rodriguez", 0, None),
    ("Kevin", "Tupik", 1, Some(2)),
    ("Kunal", "Singh", 2, None),
    ("Malia", "Brown", 3, Some(4)),
    ("Sarah", "Lourd", 4, None),
    ("Tom", "Allen", 5, Some(6)),
];

/// Load the sample organization into an empty database
///
/// Returns `false` without writing anything when departments already exist.
pub async fn seed<C: Catalog>(catalog: &mut C) -> Result<bool> {
    if !catalog.list_departments().await?.is_empty() {
        info!("database already has departments; skipping seed");
        return Ok(false);
    }

    let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
    for name in DEPARTMENTS {
        department_ids.push(catalog.insert_department(name).await?);
    }

    let mut role_ids = Vec::with_capacity(ROLES.len());
    for (title, salary, department) in ROLES {
        let role = NewRole {
            title: title.to_string(),
            salary,
            department_id: department_ids.get(department).copied(),
        };
        role_ids.push(catalog.insert_role(&role).await?);
    }

    // Managers come before their reports in EMPLOYEES
    let mut employee_ids: Vec<i64> = Vec::with_capacity(EMPLOYEES.len());
    for (first_name, last_name, role, manager) in EMPLOYEES {
        let employee = NewEmployee {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role_id: role_ids[role],
            manager_id: manager.and_then(|index| employee_ids.get(index).copied()),
        };
        employee_ids.push(catalog.insert_employee(&employee).await?);
    }

    info!(
        departments = department_ids.len(),
        roles = role_ids.len(),
        employees = employee_ids.len(),
        "seeded sample data"
    );
    Ok(true)
}
