//! Prompt sets for each flow
//!
//! Every function builds a fresh set from the rows it is given, so choice
//! lists always reflect the query that ran just before the prompt.

use crate::choice::{entity_choices, entity_choices_with_sentinel, NO_DEPARTMENT, NO_MANAGER};
use crate::menu::{Action, Category};
use crate::model::ChoiceRow;
use crate::prompt::{validate, ChoiceOption, ChoicePrompt, Question, TextPrompt};

/// Answer field names shared by the builders and the session
pub mod field {
    pub const NAME: &str = "name";
    pub const TITLE: &str = "title";
    pub const SALARY: &str = "salary";
    pub const DEPARTMENT: &str = "department";
    pub const ROLE: &str = "role";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const MANAGER: &str = "manager";
    pub const EMPLOYEE: &str = "employee";
}

pub fn category_menu() -> ChoicePrompt<Category> {
    ChoicePrompt::new(
        "category",
        "Please select a category to view, add to, or update.",
        Category::ALL.iter().map(|c| ChoiceOption::new(c.label(), *c)).collect(),
    )
}

pub fn action_menu(category: Category) -> ChoicePrompt<Action> {
    ChoicePrompt::new(
        "action",
        "What would you like to do?",
        category.actions().iter().map(|a| ChoiceOption::new(a.label(), *a)).collect(),
    )
}

pub fn add_department() -> Vec<Question> {
    vec![Question::Text(TextPrompt::new(
        field::NAME,
        "What is the name of the new department?",
        validate::department_name,
    ))]
}

/// Title, salary, then department (with a "No Department" option)
pub fn add_role(departments: &[ChoiceRow]) -> Vec<Question> {
    vec![
        Question::Text(TextPrompt::new(
            field::TITLE,
            "What is the title of the new role?",
            validate::role_title,
        )),
        Question::Text(TextPrompt::new(
            field::SALARY,
            "What is the salary for the new role?",
            validate::salary,
        )),
        Question::Choice(entity_choices_with_sentinel(
            field::DEPARTMENT,
            "Choose a department for this role",
            departments,
            NO_DEPARTMENT,
        )),
    ]
}

/// Names, role, then manager (with a "No Manager" option)
pub fn add_employee(roles: &[ChoiceRow], managers: &[ChoiceRow]) -> Vec<Question> {
    vec![
        Question::Text(TextPrompt::new(
            field::FIRST_NAME,
            "What is the first name of the employee?",
            validate::first_name,
        )),
        Question::Text(TextPrompt::new(
            field::LAST_NAME,
            "What is the last name of the employee?",
            validate::last_name,
        )),
        Question::Choice(entity_choices(field::ROLE, "Choose a role for this employee", roles)),
        Question::Choice(entity_choices_with_sentinel(
            field::MANAGER,
            "Choose a manager for this employee",
            managers,
            NO_MANAGER,
        )),
    ]
}

pub fn update_employee_role(employees: &[ChoiceRow], roles: &[ChoiceRow]) -> Vec<Question> {
    vec![
        Question::Choice(entity_choices(
            field::EMPLOYEE,
            "Which employee's role do you want to update?",
            employees,
        )),
        Question::Choice(entity_choices(
            field::ROLE,
            "Which role do you want to assign to the selected employee?",
            roles,
        )),
    ]
}

/// Both questions choose from the same employee list
pub fn update_employee_manager(employees: &[ChoiceRow]) -> Vec<Question> {
    vec![
        Question::Choice(entity_choices(
            field::EMPLOYEE,
            "Which employee's manager do you want to update?",
            employees,
        )),
        Question::Choice(entity_choices(
            field::MANAGER,
            "Who should manage the selected employee? (choose the same employee to clear)",
            employees,
        )),
    ]
}

pub fn delete_department(departments: &[ChoiceRow]) -> Vec<Question> {
    vec![Question::Choice(entity_choices(
        field::DEPARTMENT,
        "Which department do you want to delete?",
        departments,
    ))]
}

pub fn delete_role(roles: &[ChoiceRow]) -> Vec<Question> {
    vec![Question::Choice(entity_choices(field::ROLE, "Which role do you want to delete?", roles))]
}

pub fn view_by_manager(employees: &[ChoiceRow]) -> Vec<Question> {
    vec![Question::Choice(entity_choices(
        field::MANAGER,
        "Whose direct reports do you want to view?",
        employees,
    ))]
}

pub fn view_by_department(departments: &[ChoiceRow]) -> Vec<Question> {
    vec![Question::Choice(entity_choices(
        field::DEPARTMENT,
        "Which department's employees do you want to view?",
        departments,
    ))]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(questions: &[Question]) -> Vec<&'static str> {
        questions.iter().map(Question::name).collect()
    }

    #[test]
    fn test_category_menu_lists_quit_last() {
        let menu = category_menu();
        assert_eq!(menu.labels(), vec!["Departments", "Roles", "Employees", "Quit"]);
        assert_eq!(menu.options[3].value, Category::Quit);
    }

    #[test]
    fn test_action_menu_follows_category() {
        let menu = action_menu(Category::Roles);
        assert_eq!(menu.labels(), vec!["View All Roles", "Add A Role", "Delete A Role"]);
    }

    #[test]
    fn test_add_employee_field_order() {
        let questions = add_employee(&[ChoiceRow::new(1, "Engineer")], &[]);
        assert_eq!(names(&questions), vec!["first_name", "last_name", "role", "manager"]);

        let Question::Choice(manager) = &questions[3] else {
            panic!("manager should be a choice");
        };
        assert_eq!(manager.labels(), vec!["No Manager"]);
    }

    #[test]
    fn test_add_role_offers_no_department() {
        let questions = add_role(&[ChoiceRow::new(2, "Finance")]);
        assert_eq!(names(&questions), vec!["title", "salary", "department"]);

        let Question::Choice(department) = &questions[2] else {
            panic!("department should be a choice");
        };
        assert_eq!(department.labels(), vec!["Finance", "No Department"]);
    }

    #[test]
    fn test_update_manager_reuses_employee_list() {
        let employees = vec![ChoiceRow::new(1, "Ada Lovelace (Engineer)"), ChoiceRow::new(2, "Alan Turing (Lead)")];
        let questions = update_employee_manager(&employees);

        let (Question::Choice(first), Question::Choice(second)) = (&questions[0], &questions[1]) else {
            panic!("both questions should be choices");
        };
        assert_eq!(first.options, second.options);
    }

    #[test]
    fn test_builders_return_fresh_sets() {
        let first = add_role(&[ChoiceRow::new(1, "Sales")]);
        let second = add_role(&[]);
        let Question::Choice(department) = &second[2] else {
            panic!("department should be a choice");
        };
        assert_eq!(department.labels(), vec!["No Department"]);
        assert_eq!(first.len(), second.len());
    }
}
