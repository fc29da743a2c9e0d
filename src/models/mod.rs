pub mod todo;
pub mod user;

pub use todo::{Todo, TodoFilter, TodoInput, TodoState, TodoUpdate};
pub use user::{FilterPage, User, UserInput};
