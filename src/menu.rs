//! Menu State Machine
//!
//! The session moves `TopLevel → CategoryMenu → ActionFlow → TopLevel` until
//! the operator picks Quit. Transitions are pure; the session performs the
//! prompting and catalog work for each state.

use std::fmt;

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Departments,
    Roles,
    Employees,
    Quit,
}

impl Category {
    /// Menu order
    pub const ALL: [Self; 4] = [Self::Departments, Self::Roles, Self::Employees, Self::Quit];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Departments => "Departments",
            Self::Roles => "Roles",
            Self::Employees => "Employees",
            Self::Quit => "Quit",
        }
    }

    /// Actions offered under this category, in menu order
    #[must_use]
    pub const fn actions(self) -> &'static [Action] {
        match self {
            Self::Departments => &[
                Action::ViewDepartments,
                Action::ViewDepartmentBudgets,
                Action::AddDepartment,
                Action::DeleteDepartment,
            ],
            Self::Roles => &[Action::ViewRoles, Action::AddRole, Action::DeleteRole],
            Self::Employees => &[
                Action::ViewEmployees,
                Action::ViewEmployeesByManager,
                Action::ViewEmployeesByDepartment,
                Action::AddEmployee,
                Action::UpdateEmployeeRole,
                Action::UpdateEmployeeManager,
            ],
            Self::Quit => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single flow the operator can start from a category menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewDepartments,
    ViewDepartmentBudgets,
    AddDepartment,
    DeleteDepartment,
    ViewRoles,
    AddRole,
    DeleteRole,
    ViewEmployees,
    ViewEmployeesByManager,
    ViewEmployeesByDepartment,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
}

impl Action {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewDepartments => "View All Departments",
            Self::ViewDepartmentBudgets => "View Department Budgets",
            Self::AddDepartment => "Add A Department",
            Self::DeleteDepartment => "Delete A Department",
            Self::ViewRoles => "View All Roles",
            Self::AddRole => "Add A Role",
            Self::DeleteRole => "Delete A Role",
            Self::ViewEmployees => "View All Employees",
            Self::ViewEmployeesByManager => "View Employees By Manager",
            Self::ViewEmployeesByDepartment => "View Employees By Department",
            Self::AddEmployee => "Add An Employee",
            Self::UpdateEmployeeRole => "Update An Employee's Role",
            Self::UpdateEmployeeManager => "Update An Employee's Manager",
        }
    }

    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::ViewDepartments
            | Self::ViewDepartmentBudgets
            | Self::AddDepartment
            | Self::DeleteDepartment => Category::Departments,
            Self::ViewRoles | Self::AddRole | Self::DeleteRole => Category::Roles,
            Self::ViewEmployees
            | Self::ViewEmployeesByManager
            | Self::ViewEmployeesByDepartment
            | Self::AddEmployee
            | Self::UpdateEmployeeRole
            | Self::UpdateEmployeeManager => Category::Employees,
        }
    }

    /// Whether the flow writes to the catalog
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(
            self,
            Self::ViewDepartments
                | Self::ViewDepartmentBudgets
                | Self::ViewRoles
                | Self::ViewEmployees
                | Self::ViewEmployeesByManager
                | Self::ViewEmployeesByDepartment
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    TopLevel,
    CategoryMenu(Category),
    ActionFlow(Action),
    /// Terminal; nothing is asked after this
    Quit,
}

impl State {
    /// State after picking `category` at the top level
    #[must_use]
    pub const fn after_category(category: Category) -> Self {
        match category {
            Category::Quit => Self::Quit,
            other => Self::CategoryMenu(other),
        }
    }

    /// State after picking `action` from a category menu
    #[must_use]
    pub const fn after_action(action: Action) -> Self {
        Self::ActionFlow(action)
    }

    /// State after a flow finishes, successfully or not
    #[must_use]
    pub const fn after_flow() -> Self {
        Self::TopLevel
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_quit_is_terminal() {
        assert_eq!(State::after_category(Category::Quit), State::Quit);
        assert!(State::Quit.is_terminal());
        assert!(!State::TopLevel.is_terminal());
    }

    #[test]
    fn test_category_leads_to_its_menu() {
        assert_eq!(State::after_category(Category::Roles), State::CategoryMenu(Category::Roles));
        assert_eq!(
            State::after_action(Action::AddRole),
            State::ActionFlow(Action::AddRole)
        );
        assert_eq!(State::after_flow(), State::TopLevel);
    }

    #[test]
    fn test_every_action_belongs_to_the_category_that_lists_it() {
        let mut seen = HashSet::new();
        for category in Category::ALL {
            for action in category.actions() {
                assert_eq!(action.category(), category);
                assert!(seen.insert(*action), "{action} listed twice");
            }
        }
        assert_eq!(seen.len(), 13);
        assert!(Category::Quit.actions().is_empty());
    }

    #[test]
    fn test_labels_match_menu_text() {
        assert_eq!(Action::UpdateEmployeeRole.label(), "Update An Employee's Role");
        assert_eq!(Action::AddEmployee.to_string(), "Add An Employee");
        assert_eq!(Category::Departments.to_string(), "Departments");
    }

    #[test]
    fn test_view_flows_do_not_write() {
        assert!(!Action::ViewEmployeesByDepartment.is_write());
        assert!(Action::DeleteRole.is_write());
        assert!(Action::UpdateEmployeeManager.is_write());
    }
}
