//! Server-rendered HTML views.
//!
//! Templates are compiled into the binary and rendered with HTML
//! auto-escaping (every template name ends in `.html`).

use minijinja::{Environment, Error, context};
use serde::Serialize;

use crate::auth::Session;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("home.html", include_str!("templates/home.html")),
    ("sign_in.html", include_str!("templates/sign_in.html")),
    ("sign_in_control.html", include_str!("templates/sign_in_control.html")),
    ("sign_out_control.html", include_str!("templates/sign_out_control.html")),
    ("sign_out_failed.html", include_str!("templates/sign_out_failed.html")),
];

/// Data for the sign-in page.
#[derive(Debug, Default, Serialize)]
pub struct SignInPage<'a> {
    pub email_enabled: bool,
    pub providers: Vec<&'a str>,
    pub error: Option<&'a str>,
    /// Email to pre-fill after a failed attempt.
    pub email: &'a str,
}

#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Load and compile every template.
    ///
    /// # Errors
    /// Returns an error if a template fails to parse.
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Home view: the user summary and sign-out control when a session is
    /// present, the sign-in control otherwise.
    ///
    /// # Errors
    /// Returns an error if rendering fails.
    pub fn home(&self, session: Option<&Session>) -> Result<String, Error> {
        self.env.get_template("home.html")?.render(context! {
            user => session.map(|session| &session.user),
        })
    }

    /// # Errors
    /// Returns an error if rendering fails.
    pub fn sign_in(&self, page: &SignInPage<'_>) -> Result<String, Error> {
        self.env.get_template("sign_in.html")?.render(page)
    }

    /// # Errors
    /// Returns an error if rendering fails.
    pub fn sign_out_failed(&self) -> Result<String, Error> {
        self.env
            .get_template("sign_out_failed.html")?
            .render(context! {})
    }
}
