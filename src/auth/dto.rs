use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    auth::repo_types::{User, UserId},
    error::FieldError,
};

const MAX_EMAIL_LEN: usize = 100;
const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required."));
    } else if email.chars().count() > MAX_EMAIL_LEN || !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email address."));
    }
}

fn check_name(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    let len = value.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        errors.push(FieldError::new(
            field,
            format!("Must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters."),
        ));
    }
}

/// Signup form body.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub password: String,
}

impl SignupForm {
    /// Trims the text fields and lowercases the email. The password is left untouched.
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
        self.surname = self.surname.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_name("name", &self.name, &mut errors);
        check_name("surname", &self.surname, &mut errors);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Must be at least {MIN_PASSWORD_LEN} characters."),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Login form body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required."));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub surname: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            surname: u.surname,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user: PublicUser,
}
