#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page and form types for the Sylithe marketing site.
//!
//! Pages are authored as TOML and deserialized into [`Page`]. Signup and
//! login forms are posted as `application/x-www-form-urlencoded` and
//! validated locally; nothing is stored.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Minimum password length accepted by the signup and login forms.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Which group a page belongs to. Drives the navbar dropdowns.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PageGroup {
    #[default]
    Main,
    Approach,
    Methodology,
    Insights,
}

/// A marketing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Route path without the leading slash; empty for the home page.
    pub slug: String,
    pub title: String,
    pub tagline: String,
    /// Short label above the title, e.g. `SYLITHE SOLUTIONS`.
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub group: PageGroup,
    /// One-line description used in navigation menus.
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sections: Vec<PageSection>,
    /// Numbered workflow steps shown after the sections.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Page {
    /// Absolute route path, e.g. `/methodology/chm`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    pub heading: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub description: String,
}

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
    /// Number of registered pages.
    pub pages: usize,
}

/// A validation message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Loose `local@domain.tld` shape check.
#[must_use]
pub fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_email_shaped(email.trim()) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl SignupForm {
    /// Every field problem, in form order. Empty when the form is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "Passwords do not match"));
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        errors
    }
}
