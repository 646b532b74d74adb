//! Entity and Projection Types
//!
//! Each catalog read returns one of these typed records instead of a loose row
//! map. Column labels for display live in [`crate::output`], not here.

/// A department row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// A role joined (outer) with its department
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListing {
    pub id: i64,
    pub title: String,
    /// Stored salary; formatting happens at render time
    pub salary: i64,
    /// `None` when the role has no department
    pub department: Option<String>,
}

/// An employee joined (outer) with role, department and manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeListing {
    pub id: i64,
    pub full_name: String,
    pub job_title: Option<String>,
    pub salary: Option<i64>,
    pub department: Option<String>,
    /// `None` for employees at the top of the chain
    pub manager: Option<String>,
}

/// Aggregated salary spend for one department
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentBudget {
    pub id: i64,
    pub name: String,
    pub headcount: i64,
    pub utilized_budget: i64,
}

/// Lightweight `(id, label)` projection used to build choice lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRow {
    pub id: i64,
    pub label: String,
}

impl ChoiceRow {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self { id, label: label.into() }
    }
}

/// Values for a role insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub title: String,
    pub salary: i64,
    pub department_id: Option<i64>,
}

/// Values for an employee insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    pub manager_id: Option<i64>,
}

impl NewEmployee {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
