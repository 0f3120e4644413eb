pub mod agencies;
pub mod applications;
pub mod forms;
pub mod repository;
