//! `SQLite` Query Catalog Tests
//!
//! Ordering, joins and referential checks of the catalog against a database
//! file, without the interactive layer.

#![cfg(feature = "sqlite")]

mod common;

use common::{db_path, department, employee, open, role};
use pretty_assertions::assert_eq;
use roster::{seed::seed, Catalog, ChoiceRow, NewEmployee, RosterError, SqliteEngine};
use tempfile::TempDir;

/// Engineering and Sales, four roles (one without a department), four employees
async fn org(dir: &TempDir) -> SqliteEngine {
    let mut engine = open(&db_path(dir)).await;
    let sales = department(&mut engine, "Sales").await;
    let engineering = department(&mut engine, "Engineering").await;

    let lead = role(&mut engine, "Lead Engineer", 150000, Some(engineering)).await;
    let engineer = role(&mut engine, "Engineer", 85000, Some(engineering)).await;
    let rep = role(&mut engine, "Sales Rep", 60000, Some(sales)).await;
    role(&mut engine, "Intern", 20000, None).await;

    let grace = employee(&mut engine, "Grace", "Hopper", lead, None).await;
    employee(&mut engine, "Ada", "Lovelace", engineer, Some(grace)).await;
    employee(&mut engine, "Linus", "Torvalds", engineer, Some(grace)).await;
    employee(&mut engine, "Don", "Draper", rep, None).await;
    engine
}

#[tokio::test]
async fn test_departments_ordered_by_name() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let names: Vec<_> = engine.list_departments().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Engineering", "Sales"]);
}

#[tokio::test]
async fn test_roles_outer_join_department() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let roles: Vec<_> = engine
        .list_roles()
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.title, r.salary, r.department))
        .collect();

    // NULL department sorts first, then salary ascending within a department
    assert_eq!(
        roles,
        vec![
            ("Intern".to_string(), 20000, None),
            ("Engineer".to_string(), 85000, Some("Engineering".to_string())),
            ("Lead Engineer".to_string(), 150000, Some("Engineering".to_string())),
            ("Sales Rep".to_string(), 60000, Some("Sales".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_employees_ordered_by_department_then_salary_desc() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let employees = engine.list_employees().await.unwrap();
    let rows: Vec<_> = employees
        .iter()
        .map(|e| (e.full_name.as_str(), e.salary, e.manager.as_deref()))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Grace Hopper", Some(150000), None),
            ("Ada Lovelace", Some(85000), Some("Grace Hopper")),
            ("Linus Torvalds", Some(85000), Some("Grace Hopper")),
            ("Don Draper", Some(60000), None),
        ]
    );
}

#[tokio::test]
async fn test_filtered_employee_views() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let reports = engine.list_employees_by_manager(1).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|e| e.manager.as_deref() == Some("Grace Hopper")));

    // Ada has no reports: empty, not an error
    assert!(engine.list_employees_by_manager(2).await.unwrap().is_empty());

    let sales = engine.list_employees_by_department(1).await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].full_name, "Don Draper");
}

#[tokio::test]
async fn test_choice_projections() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    assert_eq!(
        engine.list_managers().await.unwrap(),
        vec![ChoiceRow::new(4, "Don Draper (Sales Rep)"), ChoiceRow::new(1, "Grace Hopper (Lead Engineer)")]
    );
    assert_eq!(
        engine.list_role_titles().await.unwrap().iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
        vec!["Engineer", "Intern", "Lead Engineer", "Sales Rep"]
    );
    assert_eq!(
        engine.list_department_names().await.unwrap(),
        vec![ChoiceRow::new(2, "Engineering"), ChoiceRow::new(1, "Sales")]
    );
    assert_eq!(engine.list_employee_names().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_department_budgets_sum_employee_salaries() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let budgets: Vec<_> = engine
        .department_budgets()
        .await
        .unwrap()
        .into_iter()
        .map(|b| (b.name, b.headcount, b.utilized_budget))
        .collect();
    assert_eq!(
        budgets,
        vec![("Engineering".to_string(), 3, 320000), ("Sales".to_string(), 1, 60000)]
    );
}

#[tokio::test]
async fn test_deletes_are_rejected_while_referenced() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let err = engine.delete_department(2).await.unwrap_err();
    assert!(matches!(err, RosterError::ReferentialIntegrity(_)));
    assert!(err.is_query_error());

    let err = engine.delete_role(2).await.unwrap_err();
    assert!(matches!(err, RosterError::ReferentialIntegrity(_)));

    // The intern role is unused
    engine.delete_role(4).await.unwrap();
    assert_eq!(engine.list_roles().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_insert_with_dangling_reference_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    let orphan = NewEmployee {
        first_name: "Nobody".to_string(),
        last_name: "Known".to_string(),
        role_id: 99,
        manager_id: None,
    };
    let err = engine.insert_employee(&orphan).await.unwrap_err();
    assert!(matches!(err, RosterError::ReferentialIntegrity(_)));
}

#[tokio::test]
async fn test_manager_cycles_are_allowed() {
    let dir = TempDir::new().unwrap();
    let mut engine = org(&dir).await;

    // Grace reports to Ada, who reports to Grace
    engine.update_employee_manager(1, Some(2)).await.unwrap();
    let grace = engine.list_employees_by_manager(2).await.unwrap();
    assert_eq!(grace[0].full_name, "Grace Hopper");
}

#[tokio::test]
async fn test_seed_only_fills_an_empty_database() {
    let dir = TempDir::new().unwrap();
    let mut engine = open(&db_path(&dir)).await;

    assert!(seed(&mut engine).await.unwrap());
    let employees = engine.list_employees().await.unwrap();
    assert_eq!(employees.len(), 8);
    assert!(!engine.list_managers().await.unwrap().is_empty());

    assert!(!seed(&mut engine).await.unwrap());
    assert_eq!(engine.list_employees().await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_data_survives_close_and_reopen() {
    let dir = TempDir::new().unwrap();
    let engine = org(&dir).await;
    engine.close().await.unwrap();

    let mut engine = open(&db_path(&dir)).await;
    assert_eq!(engine.list_employees().await.unwrap().len(), 4);
}
