// Entity Models
//
// Each entity is a plain immutable value with a natural identity key:
// the field (or field pair) used for uniqueness checks and lookups inside
// its store. Entities never mutate in place; an update produces a new
// value that replaces the old one atomically in the store.

pub mod course;
pub mod instructor;
pub mod module;
pub mod student;

pub use course::Course;
pub use instructor::Instructor;
pub use module::Module;
pub use student::Student;
