//! Identity lookup: `users` by email.

use crate::query::Select;

pub(crate) fn by_email(email: &str) -> Select {
    Select::from("users").eq("email", email)
}
