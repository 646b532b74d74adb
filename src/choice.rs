//! Choice-List Builder
//!
//! Turns `(id, label)` rows from the catalog into single-choice prompts.
//! Sentinel options stand for "no reference" and carry a `None` key.

use crate::model::ChoiceRow;
use crate::prompt::{ChoiceOption, ChoicePrompt, Key};

/// Sentinel offered when adding an employee without a manager
pub const NO_MANAGER: &str = "No Manager";

/// Sentinel offered when adding a role outside any department
pub const NO_DEPARTMENT: &str = "No Department";

/// One option per row, keyed by row id, in query order
pub fn entity_choices(name: &'static str, message: &str, rows: &[ChoiceRow]) -> ChoicePrompt<Key> {
    ChoicePrompt::new(name, message, options(rows))
}

/// Like [`entity_choices`] with a trailing `(sentinel, None)` option
///
/// The sentinel is present even when `rows` is empty.
pub fn entity_choices_with_sentinel(
    name: &'static str,
    message: &str,
    rows: &[ChoiceRow],
    sentinel: &str,
) -> ChoicePrompt<Key> {
    let mut options = options(rows);
    options.push(ChoiceOption::new(sentinel, None));
    ChoicePrompt::new(name, message, options)
}

/// Manager to store after `chosen` was picked for `employee_id`
///
/// Picking the employee themself clears the manager.
#[must_use]
pub const fn resolve_manager(employee_id: i64, chosen: i64) -> Option<i64> {
    if employee_id == chosen {
        None
    } else {
        Some(chosen)
    }
}

fn options(rows: &[ChoiceRow]) -> Vec<ChoiceOption<Key>> {
    rows.iter().map(|row| ChoiceOption::new(row.label.clone(), Some(row.id))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ChoiceRow> {
        vec![ChoiceRow::new(4, "Ada Lovelace (Engineer)"), ChoiceRow::new(9, "Alan Turing (Lead)")]
    }

    #[test]
    fn test_entity_choices_preserve_query_order() {
        let prompt = entity_choices("employee", "Which employee?", &rows());
        assert_eq!(prompt.labels(), vec!["Ada Lovelace (Engineer)", "Alan Turing (Lead)"]);
        assert_eq!(prompt.options[1].value, Some(9));
    }

    #[test]
    fn test_sentinel_is_appended_last() {
        let prompt = entity_choices_with_sentinel("manager", "Manager?", &rows(), NO_MANAGER);
        assert_eq!(prompt.options.len(), 3);
        assert_eq!(prompt.options[2], ChoiceOption::new(NO_MANAGER, None));
    }

    #[test]
    fn test_empty_rows_still_offer_sentinel() {
        let prompt = entity_choices_with_sentinel("manager", "Manager?", &[], NO_MANAGER);
        assert_eq!(prompt.options, vec![ChoiceOption::new("No Manager", None)]);
    }

    #[test]
    fn test_resolve_manager() {
        assert_eq!(resolve_manager(3, 3), None);
        assert_eq!(resolve_manager(3, 7), Some(7));
    }
}
