// Module Entity
//
// Identity: title. A module is a unit of course content; the catalog does
// not model the module-to-course relation, modules stand alone.

use serde::{Deserialize, Serialize};

use crate::store::Identified;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Identity key - unique within the module store
    pub title: String,
    pub content: String,
}

impl Module {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Module {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Identified for Module {
    fn identity(&self) -> String {
        self.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_title() {
        let module = Module::new("Week 1", "Variables and bindings");
        assert_eq!(module.identity(), "Week 1");
    }
}
