pub mod attendance;
pub mod classes;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod people;
pub mod pool;
pub mod settings;
pub mod stats;
pub mod years;

/// Build the rusqlite error used when a stored TEXT value cannot be decoded.
pub(crate) fn conversion_err(idx: usize, what: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::<dyn std::error::Error + Send + Sync>::from(what),
    )
}
