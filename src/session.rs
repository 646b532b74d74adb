//! Interactive Session
//!
//! Drives the menu state machine against one [`Catalog`], one [`Prompter`] and
//! one [`Console`]. Each flow re-queries its choice lists, asks its prompt set,
//! issues its single read or write, renders the outcome and returns to the
//! top-level menu.
//!
//! # Failure Handling
//! A flow that fails with a recoverable [`RosterError`] is reported on the
//! console and logged; the session then shows the top-level menu again. A
//! prompt failure ends the session. Either way the connection is closed
//! exactly once, by [`Session::run`].

use tracing::{info, warn};

use crate::choice::resolve_manager;
use crate::engine::Catalog;
use crate::error::{Result, RosterError};
use crate::menu::{Action, State};
use crate::model::{NewEmployee, NewRole};
use crate::output::{Console, Status, Table, TableRow};
use crate::prompt::{ask_all, Prompter};
use crate::questions::{self, field};

/// Shown when the operator quits
pub const FAREWELL: &str = "Goodbye!";

/// One interactive session over an open catalog
pub struct Session<C, P, O> {
    catalog: C,
    prompter: P,
    console: O,
}

impl<C, P, O> Session<C, P, O>
where
    C: Catalog,
    P: Prompter,
    O: Console,
{
    pub const fn new(catalog: C, prompter: P, console: O) -> Self {
        Self { catalog, prompter, console }
    }

    /// Run until the operator quits, then close the catalog
    ///
    /// Returns the fatal error that ended the session early, if any.
    pub async fn run(mut self) -> Result<()> {
        let outcome = self.drive().await;
        let closed = self.catalog.close().await;
        outcome?;
        closed
    }

    async fn drive(&mut self) -> Result<()> {
        let mut state = State::TopLevel;
        while !state.is_terminal() {
            state = match state {
                State::TopLevel => {
                    let category = questions::category_menu().ask(&mut self.prompter)?.value;
                    State::after_category(category)
                }
                State::CategoryMenu(category) => {
                    let action = questions::action_menu(category).ask(&mut self.prompter)?.value;
                    State::after_action(action)
                }
                State::ActionFlow(action) => {
                    info!(flow = action.label(), write = action.is_write(), "starting flow");
                    if let Err(e) = self.perform(action).await {
                        if !e.is_recoverable() {
                            return Err(e);
                        }
                        if e.is_query_error() {
                            warn!(flow = action.label(), code = e.error_code(), error = %e, "flow failed");
                        } else {
                            info!(flow = action.label(), code = e.error_code(), error = %e, "flow rejected input");
                        }
                        self.console.status(Status::Failure, &e.message());
                    }
                    State::after_flow()
                }
                State::Quit => State::Quit,
            };
        }
        self.console.status(Status::Farewell, FAREWELL);
        Ok(())
    }

    async fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            Action::ViewDepartments => {
                let rows = self.catalog.list_departments().await?;
                self.show(&rows);
            }
            Action::ViewDepartmentBudgets => {
                let rows = self.catalog.department_budgets().await?;
                self.show(&rows);
            }
            Action::AddDepartment => self.add_department().await?,
            Action::DeleteDepartment => self.delete_department().await?,
            Action::ViewRoles => {
                let rows = self.catalog.list_roles().await?;
                self.show(&rows);
            }
            Action::AddRole => self.add_role().await?,
            Action::DeleteRole => self.delete_role().await?,
            Action::ViewEmployees => {
                let rows = self.catalog.list_employees().await?;
                self.show(&rows);
            }
            Action::ViewEmployeesByManager => self.view_by_manager().await?,
            Action::ViewEmployeesByDepartment => self.view_by_department().await?,
            Action::AddEmployee => self.add_employee().await?,
            Action::UpdateEmployeeRole => self.update_employee_role().await?,
            Action::UpdateEmployeeManager => self.update_employee_manager().await?,
        }
        Ok(())
    }

    fn show<R: TableRow>(&mut self, rows: &[R]) {
        self.console.table(&Table::from_rows(rows));
    }

    fn info(&mut self, message: &str) {
        self.console.status(Status::Info, message);
    }

    async fn add_department(&mut self) -> Result<()> {
        let answers = ask_all(&mut self.prompter, &questions::add_department())?;
        let name = answers.text(field::NAME)?;

        self.catalog.insert_department(name).await?;
        self.console.status(Status::Success, &format!("Added {name} to the database."));
        Ok(())
    }

    async fn delete_department(&mut self) -> Result<()> {
        let departments = self.catalog.list_department_names().await?;
        if departments.is_empty() {
            self.info("There are no departments to delete.");
            return Ok(());
        }

        let answers = ask_all(&mut self.prompter, &questions::delete_department(&departments))?;
        let id = answers.required_key(field::DEPARTMENT)?;

        self.catalog.delete_department(id).await?;
        let name = answers.label(field::DEPARTMENT)?;
        self.console.status(Status::Removed, &format!("Deleted {name} from the database."));
        Ok(())
    }

    async fn add_role(&mut self) -> Result<()> {
        let departments = self.catalog.list_department_names().await?;
        let answers = ask_all(&mut self.prompter, &questions::add_role(&departments))?;

        let role = NewRole {
            title: answers.text(field::TITLE)?.to_string(),
            salary: parse_salary(answers.text(field::SALARY)?)?,
            department_id: answers.key(field::DEPARTMENT)?,
        };
        self.catalog.insert_role(&role).await?;
        self.console.status(Status::Success, &format!("Added {} to the database.", role.title));
        Ok(())
    }

    async fn delete_role(&mut self) -> Result<()> {
        let roles = self.catalog.list_role_titles().await?;
        if roles.is_empty() {
            self.info("There are no roles to delete.");
            return Ok(());
        }

        let answers = ask_all(&mut self.prompter, &questions::delete_role(&roles))?;
        let id = answers.required_key(field::ROLE)?;

        self.catalog.delete_role(id).await?;
        let title = answers.label(field::ROLE)?;
        self.console.status(Status::Removed, &format!("Deleted {title} from the database."));
        Ok(())
    }

    async fn view_by_manager(&mut self) -> Result<()> {
        let employees = self.catalog.list_employee_names().await?;
        if employees.is_empty() {
            self.info("There are no employees yet.");
            return Ok(());
        }

        let answers = ask_all(&mut self.prompter, &questions::view_by_manager(&employees))?;
        let manager_id = answers.required_key(field::MANAGER)?;

        let rows = self.catalog.list_employees_by_manager(manager_id).await?;
        if rows.is_empty() {
            let manager = answers.label(field::MANAGER)?;
            self.info(&format!("No results: {manager} has no direct reports."));
        } else {
            self.show(&rows);
        }
        Ok(())
    }

    async fn view_by_department(&mut self) -> Result<()> {
        let departments = self.catalog.list_department_names().await?;
        if departments.is_empty() {
            self.info("There are no departments yet.");
            return Ok(());
        }

        let answers = ask_all(&mut self.prompter, &questions::view_by_department(&departments))?;
        let department_id = answers.required_key(field::DEPARTMENT)?;

        let rows = self.catalog.list_employees_by_department(department_id).await?;
        if rows.is_empty() {
            let department = answers.label(field::DEPARTMENT)?;
            self.info(&format!("No results: {department} has no employees."));
        } else {
            self.show(&rows);
        }
        Ok(())
    }

    async fn add_employee(&mut self) -> Result<()> {
        let roles = self.catalog.list_role_titles().await?;
        if roles.is_empty() {
            self.info("Add a role before adding employees.");
            return Ok(());
        }
        let managers = self.catalog.list_managers().await?;

        let answers = ask_all(&mut self.prompter, &questions::add_employee(&roles, &managers))?;
        let employee = NewEmployee {
            first_name: answers.text(field::FIRST_NAME)?.to_string(),
            last_name: answers.text(field::LAST_NAME)?.to_string(),
            role_id: answers.required_key(field::ROLE)?,
            manager_id: answers.key(field::MANAGER)?,
        };

        self.catalog.insert_employee(&employee).await?;
        self.console
            .status(Status::Success, &format!("Added {} to the database.", employee.full_name()));
        Ok(())
    }

    async fn update_employee_role(&mut self) -> Result<()> {
        let employees = self.catalog.list_employee_names().await?;
        let roles = self.catalog.list_role_titles().await?;
        if employees.is_empty() || roles.is_empty() {
            self.info("There are no employees or roles to update.");
            return Ok(());
        }

        let answers =
            ask_all(&mut self.prompter, &questions::update_employee_role(&employees, &roles))?;
        let employee_id = answers.required_key(field::EMPLOYEE)?;
        let role_id = answers.required_key(field::ROLE)?;

        self.catalog.update_employee_role(employee_id, role_id).await?;
        let employee = answers.label(field::EMPLOYEE)?;
        let role = answers.label(field::ROLE)?;
        self.console.status(Status::Success, &format!("Updated {employee} to role {role}."));
        Ok(())
    }

    async fn update_employee_manager(&mut self) -> Result<()> {
        let employees = self.catalog.list_employee_names().await?;
        if employees.is_empty() {
            self.info("There are no employees to update.");
            return Ok(());
        }

        let answers = ask_all(&mut self.prompter, &questions::update_employee_manager(&employees))?;
        let employee_id = answers.required_key(field::EMPLOYEE)?;
        let manager_id = resolve_manager(employee_id, answers.required_key(field::MANAGER)?);

        self.catalog.update_employee_manager(employee_id, manager_id).await?;
        let employee = answers.label(field::EMPLOYEE)?;
        let message = match manager_id {
            Some(_) => format!("Set {} as manager of {employee}.", answers.label(field::MANAGER)?),
            None => format!("Cleared the manager of {employee}."),
        };
        self.console.status(Status::Success, &message);
        Ok(())
    }
}

/// Convert an answer that already passed the digits-only validator
fn parse_salary(input: &str) -> Result<i64> {
    input
        .parse::<i64>()
        .map_err(|_| RosterError::invalid_input(format!("Salary {input} is too large")))
}
