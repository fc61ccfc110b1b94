pub mod academic_year;
pub mod check_in_type;
pub mod event;
pub mod person;
pub mod person_kind;
pub mod report;
pub mod school_class;
pub mod settings;
pub mod status;
