pub mod academic_year;
pub mod aggregate;
pub mod backup;
pub mod calculator;
pub mod log;
pub mod purge;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod tracker;
