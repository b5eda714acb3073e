pub mod error;
pub mod forms;
pub mod model;
