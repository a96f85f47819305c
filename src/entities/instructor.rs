// Instructor Entity
//
// Identity: the name pair. Instructors carry no email or external id, so
// the identity key is derived from both name fields.

use serde::{Deserialize, Serialize};

use crate::store::Identified;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub first_name: String,
    pub last_name: String,
    /// Expertise level, 1 (junior) and up
    pub expertise: u32,
}

impl Instructor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, expertise: u32) -> Self {
        Instructor {
            first_name: first_name.into(),
            last_name: last_name.into(),
            expertise,
        }
    }
}

impl Identified for Instructor {
    /// Identity rule: first and last name joined by a single space,
    /// case-sensitive, no normalization. "Grace Hopper" and "grace hopper"
    /// are distinct instructors.
    fn identity(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_joins_names_with_space() {
        let instructor = Instructor::new("Grace", "Hopper", 3);
        assert_eq!(instructor.identity(), "Grace Hopper");
    }

    #[test]
    fn test_identity_is_case_sensitive() {
        let a = Instructor::new("Grace", "Hopper", 3);
        let b = Instructor::new("grace", "hopper", 3);
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_expertise_not_part_of_identity() {
        let a = Instructor::new("Grace", "Hopper", 1);
        let b = Instructor::new("Grace", "Hopper", 5);
        assert_eq!(a.identity(), b.identity());
    }
}
