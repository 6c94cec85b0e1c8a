use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use validator::Validate;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email and password."))]
    pub email: String,
    #[validate(length(min = 6, message = "Please provide a valid email and password."))]
    pub password: String,
}

/// Wire shape shared by `/login` and the sign-up endpoint.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub mail: &'a str,
    pub pass: &'a str,
}

impl<'a> From<&'a Credentials> for AuthRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            mail: &credentials.email,
            pass: &credentials.password,
        }
    }
}
