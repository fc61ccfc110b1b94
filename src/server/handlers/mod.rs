pub mod academic_years;
pub mod attendance;
pub mod classes;
pub mod health;
pub mod settings;
pub mod students;
pub mod teachers;
