//! MySQL Database Engine Implementation
//!
//! This module implements the [`Catalog`] trait for MySQL databases (including MariaDB).
//!
//! # Features
//! - Client-server connections via TCP
//! - One connection for the whole session, closed by [`Catalog::close`]
//! - MySQL and MariaDB version detection
//!
//! # Implementation Notes
//! - Uses `mysql_async` (async driver, requires tokio runtime)
//! - Prepared statements (`exec*`) for every user-supplied value
//! - `CONCAT` returns NULL when any argument is NULL, which leaves the manager
//!   column empty for employees without a manager
//! - Updates check the target row exists first: MySQL reports changed rows, not
//!   matched rows, so an update to the current value affects zero rows

use mysql_async::{prelude::*, Conn, OptsBuilder, Params};
use tracing::debug;

use crate::engine::{Catalog, ConnectionConfig, DatabaseType};
use crate::error::{RosterError, Result};
use crate::model::{
    ChoiceRow, Department, DepartmentBudget, EmployeeListing, NewEmployee, NewRole, RoleListing,
};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS department (
        id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(30) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS role (
        id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(30) NOT NULL,
        salary INT UNSIGNED NOT NULL,
        department_id INT NULL,
        FOREIGN KEY (department_id) REFERENCES department(id)
    )",
    "CREATE TABLE IF NOT EXISTS employee (
        id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(30) NOT NULL,
        last_name VARCHAR(30) NOT NULL,
        role_id INT NOT NULL,
        manager_id INT NULL,
        FOREIGN KEY (role_id) REFERENCES role(id),
        FOREIGN KEY (manager_id) REFERENCES employee(id)
    )",
];

const LIST_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY name ASC, id ASC";
const INSERT_DEPARTMENT: &str = "INSERT INTO department (name) VALUES (?)";
const COUNT_DEPARTMENT_ROLES: &str = "SELECT COUNT(*) FROM role WHERE department_id = ?";
const DELETE_DEPARTMENT: &str = "DELETE FROM department WHERE id = ?";

const LIST_ROLES: &str = "
SELECT r.id, r.title, CAST(r.salary AS SIGNED), d.name AS department
FROM role r
LEFT JOIN department d ON r.department_id = d.id
ORDER BY department ASC, r.salary ASC, r.id ASC";
const INSERT_ROLE: &str = "INSERT INTO role (title, salary, department_id) VALUES (?, ?, ?)";
const COUNT_ROLE_EMPLOYEES: &str = "SELECT COUNT(*) FROM employee WHERE role_id = ?";
const DELETE_ROLE: &str = "DELETE FROM role WHERE id = ?";

macro_rules! employee_listing {
    ($filter:literal) => {
        concat!(
            "SELECT e.id,
                CONCAT(e.first_name, ' ', e.last_name) AS full_name,
                r.title AS job_title,
                CAST(r.salary AS SIGNED) AS salary,
                d.name AS department,
                CONCAT(m.first_name, ' ', m.last_name) AS manager
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
const LIST_EMPLOYEES_BY_MANAGER: &str = employee_listing!("WHERE e.manager_id = ?");
const LIST_EMPLOYEES_BY_DEPARTMENT: &str = employee_listing!("WHERE r.department_id = ?");

const INSERT_EMPLOYEE: &str =
    "INSERT INTO employee (first_name, last_name, role_id, manager_id) VALUES (?, ?, ?, ?)";
const COUNT_EMPLOYEE: &str = "SELECT COUNT(*) FROM employee WHERE id = ?";
const UPDATE_EMPLOYEE_ROLE: &str = "UPDATE employee SET role_id = ? WHERE id = ?";
const UPDATE_EMPLOYEE_MANAGER: &str = "UPDATE employee SET manager_id = ? WHERE id = ?";

const LIST_MANAGERS: &str = "
SELECT e.id, CONCAT(e.first_name, ' ', e.last_name, ' (', COALESCE(r.title, 'No Role'), ')') AS label
FROM employee e
LEFT JOIN role r ON e.role_id = r.id
WHERE e.manager_id IS NULL
ORDER BY label ASC, e.id ASC";
const LIST_EMPLOYEE_NAMES: &str = "
SELECT e.id, CONCAT(e.first_name, ' ', e.last_name, ' (', COALESCE(r.title, 'No Role'), ')') AS label
FROM employee e
LEFT JOIN role r ON e.role_id = r.id
ORDER BY label ASC, e.id ASC";
const LIST_ROLE_TITLES: &str = "SELECT id, title FROM role ORDER BY title ASC, id ASC";
const LIST_DEPARTMENT_NAMES: &str = "SELECT id, name FROM department ORDER BY name ASC, id ASC";

const DEPARTMENT_BUDGETS: &str = "
SELECT d.id,
       d.name,
       COUNT(e.id) AS headcount,
       CAST(COALESCE(SUM(CASE WHEN e.id IS NOT NULL THEN r.salary END), 0) AS SIGNED) AS utilized_budget
FROM department d
LEFT JOIN role r ON r.department_id = d.id
LEFT JOIN employee e ON e.role_id = r.id
GROUP BY d.id, d.name
ORDER BY d.name ASC, d.id ASC";

/// ER_ROW_IS_REFERENCED_2 and ER_NO_REFERENCED_ROW_2
const FOREIGN_KEY_ERROR_CODES: [u16; 2] = [1451, 1452];

type EmployeeTuple = (i64, String, Option<String>, Option<i64>, Option<String>, Option<String>);

/// MySQL database engine implementation
pub struct MySqlEngine {
    conn: Conn,
}

impl MySqlEngine {
    /// Connect using `config`
    pub async fn open(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for MySQL
        if config.engine != DatabaseType::MySQL {
            return Err(RosterError::invalid_input(format!(
                "Expected MySQL engine, got {}",
                config.engine
            )));
        }

        let opts = build_mysql_opts(config)?;

        let conn = Conn::new(opts).await.map_err(|e| {
            RosterError::connection_failed(format!("Failed to connect to MySQL: {e}"))
        })?;
        debug!(target_db = %config.describe(), "connected to mysql");

        Ok(Self { conn })
    }

    async fn count(&mut self, name: &'static str, sql: &str, id: i64) -> Result<i64> {
        let count: Option<i64> =
            self.conn.exec_first(sql, (id,)).await.map_err(|e| mysql_error(name, e))?;
        Ok(count.unwrap_or(0))
    }

    async fn employees(
        &mut self,
        name: &'static str,
        sql: &str,
        params: Params,
    ) -> Result<Vec<EmployeeListing>> {
        let rows: Vec<EmployeeTuple> =
            self.conn.exec(sql, params).await.map_err(|e| mysql_error(name, e))?;
        debug!(statement = name, rows = rows.len(), "mysql query");

        Ok(rows
            .into_iter()
            .map(|(id, full_name, job_title, salary, department, manager)| EmployeeListing {
                id,
                full_name,
                job_title,
                salary,
                department,
                manager,
            })
            .collect())
    }

    async fn choices(&mut self, name: &'static str, sql: &str) -> Result<Vec<ChoiceRow>> {
        let rows: Vec<(i64, String)> =
            self.conn.exec(sql, Params::Empty).await.map_err(|e| mysql_error(name, e))?;
        debug!(statement = name, rows = rows.len(), "mysql query");

        Ok(rows.into_iter().map(|(id, label)| ChoiceRow { id, label }).collect())
    }

    async fn insert<P>(&mut self, name: &'static str, sql: &str, params: P) -> Result<i64>
    where
        P: Into<Params> + Send,
    {
        self.conn.exec_drop(sql, params).await.map_err(|e| mysql_error(name, e))?;

        let id = self
            .conn
            .last_insert_id()
            .ok_or_else(|| RosterError::query_failed(format!("{name}: no insert id returned")))?;
        debug!(statement = name, id, "mysql insert");

        i64::try_from(id)
            .map_err(|_| RosterError::query_failed(format!("{name}: insert id {id} out of range")))
    }

    async fn ensure_employee(&mut self, employee_id: i64) -> Result<()> {
        if self.count("count_employee", COUNT_EMPLOYEE, employee_id).await? == 0 {
            return Err(RosterError::query_failed(format!("No employee with id {employee_id}")));
        }
        Ok(())
    }
}

impl Catalog for MySqlEngine {
    fn engine(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    async fn server_version(&mut self) -> Result<String> {
        let version_string: String = self
            .conn
            .query_first("SELECT VERSION()")
            .await
            .map_err(|e| {
                RosterError::connection_failed(format!("Failed to query MySQL version: {e}"))
            })?
            .ok_or_else(|| RosterError::connection_failed("No version returned"))?;

        let (_, server_info) = parse_mysql_version(&version_string);
        Ok(server_info)
    }

    async fn ensure_schema(&mut self) -> Result<()> {
        for statement in SCHEMA {
            self.conn.query_drop(statement).await.map_err(|e| {
                RosterError::engine_error("mysql", format!("Failed to create schema: {e}"))
            })?;
        }
        Ok(())
    }

    async fn list_departments(&mut self) -> Result<Vec<Department>> {
        let rows: Vec<(i64, String)> = self
            .conn
            .exec(LIST_DEPARTMENTS, Params::Empty)
            .await
            .map_err(|e| mysql_error("list_departments", e))?;

        Ok(rows.into_iter().map(|(id, name)| Department { id, name }).collect())
    }

    async fn insert_department(&mut self, name: &str) -> Result<i64> {
        self.insert("insert_department", INSERT_DEPARTMENT, (name,)).await
    }

    async fn delete_department(&mut self, id: i64) -> Result<()> {
        let roles = self.count("count_department_roles", COUNT_DEPARTMENT_ROLES, id).await?;
        if roles > 0 {
            return Err(RosterError::referential_integrity(format!(
                "department {id} still has {roles} role(s); delete or reassign them first"
            )));
        }

        self.conn
            .exec_drop(DELETE_DEPARTMENT, (id,))
            .await
            .map_err(|e| mysql_error("delete_department", e))?;
        expect_one(self.conn.affected_rows(), "department", id)
    }

    async fn list_roles(&mut self) -> Result<Vec<RoleListing>> {
        let rows: Vec<(i64, String, i64, Option<String>)> =
            self.conn.exec(LIST_ROLES, Params::Empty).await.map_err(|e| mysql_error("list_roles", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, title, salary, department)| RoleListing { id, title, salary, department })
            .collect())
    }

    async fn insert_role(&mut self, role: &NewRole) -> Result<i64> {
        self.insert(
            "insert_role",
            INSERT_ROLE,
            (role.title.as_str(), role.salary, role.department_id),
        )
        .await
    }

    async fn delete_role(&mut self, id: i64) -> Result<()> {
        let employees = self.count("count_role_employees", COUNT_ROLE_EMPLOYEES, id).await?;
        if employees > 0 {
            return Err(RosterError::referential_integrity(format!(
                "role {id} is still held by {employees} employee(s); update their roles first"
            )));
        }

        self.conn.exec_drop(DELETE_ROLE, (id,)).await.map_err(|e| mysql_error("delete_role", e))?;
        expect_one(self.conn.affected_rows(), "role", id)
    }

    async fn list_employees(&mut self) -> Result<Vec<EmployeeListing>> {
        self.employees("list_employees", LIST_EMPLOYEES, Params::Empty).await
    }

    async fn list_employees_by_manager(&mut self, manager_id: i64) -> Result<Vec<EmployeeListing>> {
        self.employees("list_employees_by_manager", LIST_EMPLOYEES_BY_MANAGER, (manager_id,).into())
            .await
    }

    async fn list_employees_by_department(
        &mut self,
        department_id: i64,
    ) -> Result<Vec<EmployeeListing>> {
        self.employees(
            "list_employees_by_department",
            LIST_EMPLOYEES_BY_DEPARTMENT,
            (department_id,).into(),
        )
        .await
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> Result<i64> {
        self.insert(
            "insert_employee",
            INSERT_EMPLOYEE,
            (
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.role_id,
                employee.manager_id,
            ),
        )
        .await
    }

    async fn update_employee_role(&mut self, employee_id: i64, role_id: i64) -> Result<()> {
        self.ensure_employee(employee_id).await?;
        self.conn
            .exec_drop(UPDATE_EMPLOYEE_ROLE, (role_id, employee_id))
            .await
            .map_err(|e| mysql_error("update_employee_role", e))
    }

    async fn update_employee_manager(
        &mut self,
        employee_id: i64,
        manager_id: Option<i64>,
    ) -> Result<()> {
        self.ensure_employee(employee_id).await?;
        self.conn
            .exec_drop(UPDATE_EMPLOYEE_MANAGER, (manager_id, employee_id))
            .await
            .map_err(|e| mysql_error("update_employee_manager", e))
    }

    async fn list_managers(&mut self) -> Result<Vec<ChoiceRow>> {
        self.choices("list_managers", LIST_MANAGERS).await
    }

    async fn list_employee_names(&mut self) -> Result<Vec<ChoiceRow>> {
        self.choices("list_employee_names", LIST_EMPLOYEE_NAMES).await
    }

    async fn list_role_titles(&mut self) -> Result<Vec<ChoiceRow>> {
        self.choices("list_role_titles", LIST_ROLE_TITLES).await
    }

    async fn list_department_names(&mut self) -> Result<Vec<ChoiceRow>> {
        self.choices("list_department_names", LIST_DEPARTMENT_NAMES).await
    }

    async fn department_budgets(&mut self) -> Result<Vec<DepartmentBudget>> {
        let rows: Vec<(i64, String, i64, i64)> = self
            .conn
            .exec(DEPARTMENT_BUDGETS, Params::Empty)
            .await
            .map_err(|e| mysql_error("department_budgets", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, headcount, utilized_budget)| DepartmentBudget {
                id,
                name,
                headcount,
                utilized_budget,
            })
            .collect())
    }

    async fn close(self) -> Result<()> {
        self.conn.disconnect().await.map_err(|e| {
            RosterError::connection_failed(format!("Failed to disconnect: {e}"))
        })?;
        debug!("closed mysql connection");
        Ok(())
    }
}

/// Build MySQL connection options from ConnectionConfig
fn build_mysql_opts(config: &ConnectionConfig) -> Result<OptsBuilder> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| RosterError::invalid_input("MySQL requires 'host' parameter"))?;

    let port = config
        .port
        .ok_or_else(|| RosterError::invalid_input("MySQL requires 'port' parameter"))?;

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| RosterError::invalid_input("MySQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| RosterError::invalid_input("MySQL requires 'database' parameter"))?;

    // An empty password is legitimate for local development servers
    let opts = OptsBuilder::default()
        .ip_or_hostname(host)
        .tcp_port(port)
        .user(Some(user))
        .pass(config.password.as_ref())
        .db_name(Some(database));

    Ok(opts)
}

/// Parse MySQL version string to detect MySQL vs MariaDB
fn parse_mysql_version(version_string: &str) -> (String, String) {
    // Example MySQL: "8.0.35"
    // Example MariaDB: "10.11.2-MariaDB"

    if version_string.to_uppercase().contains("MARIADB") {
        let version = version_string.split('-').next().unwrap_or("unknown").to_string();
        (version.clone(), format!("MariaDB {version}"))
    } else {
        let version =
            version_string.split_whitespace().next().unwrap_or(version_string).to_string();
        (version.clone(), format!("MySQL {version}"))
    }
}

fn expect_one(affected: u64, entity: &str, id: i64) -> Result<()> {
    if affected == 0 {
        return Err(RosterError::query_failed(format!("No {entity} with id {id}")));
    }
    Ok(())
}

/// Map a driver error, singling out foreign key violations
fn mysql_error(statement: &str, e: mysql_async::Error) -> RosterError {
    match &e {
        mysql_async::Error::Server(server) if FOREIGN_KEY_ERROR_CODES.contains(&server.code) => {
            RosterError::referential_integrity(format!("{statement}: {}", server.message))
        }
        _ => RosterError::query_failed(format!("{statement}: {e}")),
    }
}
