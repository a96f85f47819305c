// Course Entity
//
// Identity: title.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::Identified;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Identity key - unique within the course store
    pub title: String,
    pub description: String,
    pub credits: u32,
    pub start_date: NaiveDate,
}

impl Course {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        credits: u32,
        start_date: NaiveDate,
    ) -> Self {
        Course {
            title: title.into(),
            description: description.into(),
            credits,
            start_date,
        }
    }
}

impl Identified for Course {
    fn identity(&self) -> String {
        self.title.clone()
    }
}
