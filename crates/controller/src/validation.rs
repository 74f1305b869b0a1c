//! Field rules applied to a submission before it may reach the store.

use shared::{domain::Gender, error::ValidationError};
use unicode_general_category::{get_general_category, GeneralCategory};

pub const MIN_COMMENT_CHARS: usize = 10;

/// Input that passed every rule, ready to be persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<'a> {
    pub name: &'a str,
    pub gender: Gender,
    pub comment: &'a str,
}

/// Checks the rules in order and reports the first one that fails.
///
/// `name` is carried through untouched; `comment` is trimmed.
pub fn validate<'a>(
    name: &'a str,
    gender: &str,
    comment: &'a str,
) -> Result<Submission<'a>, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !name.chars().filter(|c| *c != ' ').all(is_letter) {
        return Err(ValidationError::InvalidNameChars);
    }
    let gender = gender
        .parse::<Gender>()
        .map_err(|_| ValidationError::InvalidGender)?;
    let comment = comment.trim();
    if comment.chars().count() < MIN_COMMENT_CHARS {
        return Err(ValidationError::CommentTooShort);
    }

    Ok(Submission {
        name,
        gender,
        comment,
    })
}

/// Letter categories only (Lu, Ll, Lt, Lm, Lo); letter numbers such as `Ⅻ`
/// and combining marks are not letters here.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
