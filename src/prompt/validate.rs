//! Input validators for free-text prompts
//!
//! Each validator checks the raw input string exactly as typed (no trimming)
//! and returns the fixed message shown when the input is rejected.

pub const DEPARTMENT_NAME_MESSAGE: &str = "Please enter a department name.";
pub const ROLE_TITLE_MESSAGE: &str = "Please enter a role title.";
pub const SALARY_MESSAGE: &str = "Please enter a numeric salary.";
pub const FIRST_NAME_MESSAGE: &str = "Please enter a first name without numbers.";
pub const LAST_NAME_MESSAGE: &str = "Please enter a last name without numbers.";

type Outcome = std::result::Result<(), &'static str>;

pub fn department_name(input: &str) -> Outcome {
    non_empty(input, DEPARTMENT_NAME_MESSAGE)
}

pub fn role_title(input: &str) -> Outcome {
    non_empty(input, ROLE_TITLE_MESSAGE)
}

/// Base-10 digits only: no sign, no decimal point, no separators
pub fn salary(input: &str) -> Outcome {
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(SALARY_MESSAGE)
    }
}

pub fn first_name(input: &str) -> Outcome {
    person_name(input, FIRST_NAME_MESSAGE)
}

pub fn last_name(input: &str) -> Outcome {
    person_name(input, LAST_NAME_MESSAGE)
}

fn non_empty(input: &str, message: &'static str) -> Outcome {
    if input.is_empty() {
        Err(message)
    } else {
        Ok(())
    }
}

fn person_name(input: &str, message: &'static str) -> Outcome {
    if input.is_empty() || input.bytes().any(|b| b.is_ascii_digit()) {
        Err(message)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_accepts_digit_strings() {
        for input in ["0", "7", "85000", "000120", "99999999999999999999999"] {
            assert_eq!(salary(input), Ok(()), "{input:?} should be accepted");
        }
    }

    #[test]
    fn test_salary_rejects_everything_else() {
        for input in ["", " ", "85,000", "85000.00", "-5", "+5", "85k", " 85000", "８５"] {
            assert_eq!(salary(input), Err(SALARY_MESSAGE), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_person_names_reject_digits_and_empty() {
        for input in ["", "R2D2", "Ada1", "9"] {
            assert_eq!(first_name(input), Err(FIRST_NAME_MESSAGE));
            assert_eq!(last_name(input), Err(LAST_NAME_MESSAGE));
        }
    }

    #[test]
    fn test_person_names_accept_letters_and_punctuation() {
        for input in ["Ada", "O'Brien", "Mary-Jane", "José", "van der Berg"] {
            assert_eq!(first_name(input), Ok(()));
            assert_eq!(last_name(input), Ok(()));
        }
    }

    #[test]
    fn test_titles_and_department_names_only_reject_empty() {
        assert_eq!(department_name(""), Err(DEPARTMENT_NAME_MESSAGE));
        assert_eq!(department_name("R&D 2"), Ok(()));
        assert_eq!(role_title(""), Err(ROLE_TITLE_MESSAGE));
        assert_eq!(role_title("Engineer II"), Ok(()));
    }
}
