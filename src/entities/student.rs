// Student Entity
//
// Identity: email. Two students with the same email are the same student
// as far as the store is concerned, regardless of name or enrollment date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::Identified;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    /// Identity key - unique within the student store
    pub email: String,
    pub enrollment_date: NaiveDate,
}

impl Student {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        enrollment_date: NaiveDate,
    ) -> Self {
        Student {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            enrollment_date,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identified for Student {
    fn identity(&self) -> String {
        self.email.clone()
    }
}
