//! `SQLite` Database Engine Implementation
//!
//! This module implements the [`Catalog`] trait for `SQLite` databases.
//!
//! # Features
//! - File-based connections (`/path/to/employees.db`)
//! - In-memory connections (`:memory:`)
//! - Foreign keys enforced per connection (`PRAGMA foreign_keys = ON`)
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - String concatenation uses `||`
//! - Numbered parameters (`?1`) for every user-supplied value

use rusqlite::{params, Connection, OpenFlags, Params, Row};
use tracing::debug;

use crate::engine::{Catalog, ConnectionConfig, DatabaseType};
use crate::error::{RosterError, Result};
use crate::model::{
    ChoiceRow, Department, DepartmentBudget, EmployeeListing, NewEmployee, NewRole, RoleListing,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS department (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(30) NOT NULL
);
CREATE TABLE IF NOT EXISTS role (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(30) NOT NULL,
    salary INTEGER NOT NULL CHECK (salary >= 0),
    department_id INTEGER REFERENCES department(id)
);
CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name VARCHAR(30) NOT NULL,
    last_name VARCHAR(30) NOT NULL,
    role_id INTEGER NOT NULL REFERENCES role(id),
    manager_id INTEGER REFERENCES employee(id)
);";

const LIST_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY name ASC, id ASC";
const INSERT_DEPARTMENT: &str = "INSERT INTO department (name) VALUES (?1)";
const COUNT_DEPARTMENT_ROLES: &str = "SELECT COUNT(*) FROM role WHERE department_id = ?1";
const DELETE_DEPARTMENT: &str = "DELETE FROM department WHERE id = ?1";

const LIST_ROLES: &str = "
SELECT r.id, r.title, r.salary, d.name AS department
FROM role r
LEFT JOIN department d ON r.department_id = d.id
ORDER BY department ASC, r.salary ASC, r.id ASC";
const INSERT_ROLE: &str = "INSERT INTO role (title, salary, department_id) VALUES (?1, ?2, ?3)";
const COUNT_ROLE_EMPLOYEES: &str = "SELECT COUNT(*) FROM employee WHERE role_id = ?1";
const DELETE_ROLE: &str = "DELETE FROM role WHERE id = ?1";

macro_rules! employee_listing {
    ($filter:literal) => {
        concat!(
            "SELECT e.id,
                e.first_name || ' ' || e.last_name AS full_name,
                r.title AS job_title,
                r.salary,
                d.name AS department,
                m.first_name || ' ' || m.last_name AS manager
            FROM employee e
            LEFT JOIN employee m ON e.manager_id = m.id
            LEFT JOIN role r ON e.role_id = r.id
            LEFT JOIN department d ON r.department_id = d.id ",
            $filter,
            " ORDER BY department ASC, r.salary DESC, e.id ASC"
        )
    };
}

const LIST_EMPLOYEES: &str = employee_listing!("");
const LIST_EMPLOYEES_BY_MANAGER: &str = employee_listing!("WHERE e.manager_id = ?1");
const LIST_EMPLOYEES_BY_DEPARTMENT: &str = employee_listing!("WHERE r.department_id = ?1");

const INSERT_EMPLOYEE: &str =
    "INSERT INTO employee (first_name, last_name, role_id, manager_id) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_EMPLOYEE_ROLE: &str = "UPDATE employee SET role_id = ?1 WHERE id = ?2";
const UPDATE_EMPLOYEE_MANAGER: &str = "UPDATE employee SET manager_id = ?1 WHERE id = ?2";

const LIST_MANAGERS: &str = "
SELECT e.id, e.first_name || ' ' || e.last_name || ' (' || COALESCE(r.title, 'No Role') || ')' AS label
FROM employee e
LEFT JOIN role r ON e.role_id = r.id
WHERE e.manager_id IS NULL
ORDER BY label ASC, e.id ASC";
const LIST_EMPLOYEE_NAMES: &str = "
SELECT e.id, e.first_name || ' ' || e.last_name || ' (' || COALESCE(r.title, 'No Role') || ')' AS label
FROM employee e
LEFT JOIN role r ON e.role_id = r.id
ORDER BY label ASC, e.id ASC";
const LIST_ROLE_TITLES: &str = "SELECT id, title FROM role ORDER BY title ASC, id ASC";
const LIST_DEPARTMENT_NAMES: &str = "SELECT id, name FROM department ORDER BY name ASC, id ASC";

const DEPARTMENT_BUDGETS: &str = "
SELECT d.id,
       d.name,
       COUNT(e.id) AS headcount,
       COALESCE(SUM(CASE WHEN e.id IS NOT NULL THEN r.salary END), 0) AS utilized_budget
FROM department d
LEFT JOIN role r ON r.department_id = d.id
LEFT JOIN employee e ON e.role_id = r.id
GROUP BY d.id, d.name
ORDER BY d.name ASC, d.id ASC";

/// `SQLite` database engine implementation
pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    /// Open the database file named by `config`
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for SQLite
        if config.engine != DatabaseType::SQLite {
            return Err(RosterError::invalid_input(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| RosterError::invalid_input("SQLite requires 'file' parameter"))?;

        let path_str = file_path.to_str().ok_or_else(|| {
            RosterError::invalid_input("SQLite file path contains invalid UTF-8 characters")
        })?;

        let conn = open_connection(path_str)?;
        debug!(file = path_str, "opened sqlite database");

        Ok(Self { conn })
    }

    fn query_rows<T, P, F>(&self, name: &'static str, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql).map_err(|e| sqlite_error(name, e))?;
        let rows = stmt
            .query_map(params, map)
            .map_err(|e| sqlite_error(name, e))?
            .collect::<std::result::Result<Vec<T>, _>>()
            .map_err(|e| sqlite_error(name, e))?;

        debug!(statement = name, rows = rows.len(), "sqlite query");
        Ok(rows)
    }

    fn execute<P: Params>(&self, name: &'static str, sql: &str, params: P) -> Result<usize> {
        let affected = self.conn.execute(sql, params).map_err(|e| sqlite_error(name, e))?;
        debug!(statement = name, affected, "sqlite execute");
        Ok(affected)
    }

    fn count<P: Params>(&self, name: &'static str, sql: &str, params: P) -> Result<i64> {
        self.conn.query_row(sql, params, |row| row.get(0)).map_err(|e| sqlite_error(name, e))
    }
}

impl Catalog for SqliteEngine {
    fn engine(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn server_version(&mut self) -> Result<String> {
        self.conn.query_row("SELECT sqlite_version()", [], |row| row.get(0)).map_err(|e| {
            RosterError::connection_failed(format!("Failed to query SQLite version: {e}"))
        })
    }

    async fn ensure_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| RosterError::engine_error("sqlite", format!("Failed to create schema: {e}")))
    }

    async fn list_departments(&mut self) -> Result<Vec<Department>> {
        self.query_rows("list_departments", LIST_DEPARTMENTS, [], |row| {
            Ok(Department { id: row.get(0)?, name: row.get(1)? })
        })
    }

    async fn insert_department(&mut self, name: &str) -> Result<i64> {
        self.execute("insert_department", INSERT_DEPARTMENT, params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn delete_department(&mut self, id: i64) -> Result<()> {
        let roles = self.count("count_department_roles", COUNT_DEPARTMENT_ROLES, params![id])?;
        if roles > 0 {
            return Err(RosterError::referential_integrity(format!(
                "department {id} still has {roles} role(s); delete or reassign them first"
            )));
        }

        let affected = self.execute("delete_department", DELETE_DEPARTMENT, params![id])?;
        expect_one(affected, "department", id)
    }

    async fn list_roles(&mut self) -> Result<Vec<RoleListing>> {
        self.query_rows("list_roles", LIST_ROLES, [], |row| {
            Ok(RoleListing {
                id: row.get(0)?,
                title: row.get(1)?,
                salary: row.get(2)?,
                department: row.get(3)?,
            })
        })
    }

    async fn insert_role(&mut self, role: &NewRole) -> Result<i64> {
        self.execute(
            "insert_role",
            INSERT_ROLE,
            params![role.title, role.salary, role.department_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn delete_role(&mut self, id: i64) -> Result<()> {
        let employees = self.count("count_role_employees", COUNT_ROLE_EMPLOYEES, params![id])?;
        if employees > 0 {
            return Err(RosterError::referential_integrity(format!(
                "role {id} is still held by {employees} employee(s); update their roles first"
            )));
        }

        let affected = self.execute("delete_role", DELETE_ROLE, params![id])?;
        expect_one(affected, "role", id)
    }

    async fn list_employees(&mut self) -> Result<Vec<EmployeeListing>> {
        self.query_rows("list_employees", LIST_EMPLOYEES, [], employee_from_row)
    }

    async fn list_employees_by_manager(&mut self, manager_id: i64) -> Result<Vec<EmployeeListing>> {
        self.query_rows(
            "list_employees_by_manager",
            LIST_EMPLOYEES_BY_MANAGER,
            params![manager_id],
            employee_from_row,
        )
    }

    async fn list_employees_by_department(
        &mut self,
        department_id: i64,
    ) -> Result<Vec<EmployeeListing>> {
        self.query_rows(
            "list_employees_by_department",
            LIST_EMPLOYEES_BY_DEPARTMENT,
            params![department_id],
            employee_from_row,
        )
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> Result<i64> {
        self.execute(
            "insert_employee",
            INSERT_EMPLOYEE,
            params![employee.first_name, employee.last_name, employee.role_id, employee.manager_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn update_employee_role(&mut self, employee_id: i64, role_id: i64) -> Result<()> {
        let affected =
            self.execute("update_employee_role", UPDATE_EMPLOYEE_ROLE, params![role_id, employee_id])?;
        expect_one(affected, "employee", employee_id)
    }

    async fn update_employee_manager(
        &mut self,
        employee_id: i64,
        manager_id: Option<i64>,
    ) -> Result<()> {
        let affected = self.execute(
            "update_employee_manager",
            UPDATE_EMPLOYEE_MANAGER,
            params![manager_id, employee_id],
        )?;
        expect_one(affected, "employee", employee_id)
    }

    async fn list_managers(&mut self) -> Result<Vec<ChoiceRow>> {
        self.query_rows("list_managers", LIST_MANAGERS, [], choice_from_row)
    }

    async fn list_employee_names(&mut self) -> Result<Vec<ChoiceRow>> {
        self.query_rows("list_employee_names", LIST_EMPLOYEE_NAMES, [], choice_from_row)
    }

    async fn list_role_titles(&mut self) -> Result<Vec<ChoiceRow>> {
        self.query_rows("list_role_titles", LIST_ROLE_TITLES, [], choice_from_row)
    }

    async fn list_department_names(&mut self) -> Result<Vec<ChoiceRow>> {
        self.query_rows("list_department_names", LIST_DEPARTMENT_NAMES, [], choice_from_row)
    }

    async fn department_budgets(&mut self) -> Result<Vec<DepartmentBudget>> {
        self.query_rows("department_budgets", DEPARTMENT_BUDGETS, [], |row| {
            Ok(DepartmentBudget {
                id: row.get(0)?,
                name: row.get(1)?,
                headcount: row.get(2)?,
                utilized_budget: row.get(3)?,
            })
        })
    }

    async fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| {
            RosterError::connection_failed(format!("Failed to close SQLite database: {e}"))
        })?;
        debug!("closed sqlite database");
        Ok(())
    }
}

/// Open `SQLite` connection with foreign keys enforced
fn open_connection(path: &str) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;

    let conn = Connection::open_with_flags(path, flags).map_err(|e| {
        RosterError::connection_failed(format!("Failed to open SQLite database: {e}"))
    })?;

    // Off by default in SQLite, per connection
    conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(|e| {
        RosterError::connection_failed(format!("Failed to enable foreign keys: {e}"))
    })?;

    Ok(conn)
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<EmployeeListing> {
    Ok(EmployeeListing {
        id: row.get(0)?,
        full_name: row.get(1)?,
        job_title: row.get(2)?,
        salary: row.get(3)?,
        department: row.get(4)?,
        manager: row.get(5)?,
    })
}

fn choice_from_row(row: &Row<'_>) -> rusqlite::Result<ChoiceRow> {
    Ok(ChoiceRow { id: row.get(0)?, label: row.get(1)? })
}

fn expect_one(affected: usize, entity: &str, id: i64) -> Result<()> {
    if affected == 0 {
        return Err(RosterError::query_failed(format!("No {entity} with id {id}")));
    }
    Ok(())
}

/// Map a driver error, singling out foreign key violations
fn sqlite_error(statement: &str, e: rusqlite::Error) -> RosterError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            RosterError::referential_integrity(format!("{statement}: {e}"))
        }
        _ => RosterError::query_failed(format!("{statement}: {e}")),
    }
}
