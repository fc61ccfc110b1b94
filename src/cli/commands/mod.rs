pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod purge;
pub mod report;
pub mod scan;
pub mod serve;
pub mod settings;
pub mod student;
pub mod teacher;
pub mod year;
