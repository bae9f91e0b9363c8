//! Sign-in and sign-up forms. Validation is local and nothing is submitted.

use anyhow::Result;
use colored::Colorize;
use movienight_core::auth::{LoginForm, SignupForm};

pub fn login(email: String, password: String, remember_me: bool) -> Result<()> {
    let form = LoginForm {
        email,
        password,
        remember_me,
    };
    form.validate()?;
    println!("{}", "Form is valid. There is no account service, nothing was sent.".dimmed());
    Ok(())
}

pub fn signup(email: String, password: String) -> Result<()> {
    SignupForm { email, password }.validate()?;
    println!("{}", "Form is valid. There is no account service, nothing was sent.".dimmed());
    Ok(())
}
