use std::fmt;

use serde::Serialize;

use super::dto::NewUser;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Email,
    Password,
    PasswordConfirmation,
    FirstName,
    LastName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Missing,
    TooShort,
    Mismatch,
    NotUnique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Violation {
    pub field: Field,
    pub reason: Reason,
}

impl Violation {
    pub fn new(field: Field, reason: Reason) -> Self {
        Self { field, reason }
    }
}

/// Every constraint a candidate failed, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, field: Field, reason: Reason) {
        let v = Violation::new(field, reason);
        if !self.0.contains(&v) {
            self.0.push(v);
            self.0.sort();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: Field, reason: Reason) -> bool {
        self.0.contains(&Violation::new(field, reason))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::PasswordConfirmation => "password_confirmation",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::Missing => "missing",
            Reason::TooShort => "too_short",
            Reason::Mismatch => "mismatch",
            Reason::NotUnique => "not_unique",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", v.field, v.reason)?;
        }
        Ok(())
    }
}

/// Blank means absent, empty, or whitespace only.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn check_password(violations: &mut Violations, field: Field, value: Option<&str>) {
    match value {
        None => violations.push(field, Reason::Missing),
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
            violations.push(field, Reason::TooShort)
        }
        Some(_) => {}
    }
}

/// Checks every rule that needs no storage access. Uniqueness is checked by
/// the credential store.
pub fn check_fields(candidate: &NewUser) -> Violations {
    let mut violations = Violations::default();

    if present(&candidate.email).is_none() {
        violations.push(Field::Email, Reason::Missing);
    }

    let password = present(&candidate.password);
    let confirmation = present(&candidate.password_confirmation);
    check_password(&mut violations, Field::Password, password);
    check_password(&mut violations, Field::PasswordConfirmation, confirmation);

    if let (Some(p), Some(c)) = (password, confirmation) {
        if p != c {
            violations.push(Field::PasswordConfirmation, Reason::Mismatch);
        }
    }

    if present(&candidate.first_name).is_none() {
        violations.push(Field::FirstName, Reason::Missing);
    }
    if present(&candidate.last_name).is_none() {
        violations.push(Field::LastName, Reason::Missing);
    }

    violations
}
