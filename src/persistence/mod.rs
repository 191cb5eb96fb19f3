use crate::roster::WardRoster;
use crate::ward::Ward;
use crate::ward_validation;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait WardStore {
    fn save_roster(&self, roster: &WardRoster) -> PersistenceResult<()>;
    fn load_roster(&self) -> PersistenceResult<Option<WardRoster>>;
}

pub fn validate_wards(wards: &[Ward]) -> PersistenceResult<()> {
    ward_validation::validate_ward_collection(wards)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub(crate) fn roster_from_wards(wards: Vec<Ward>) -> PersistenceResult<WardRoster> {
    WardRoster::from_wards(wards).map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_roster_from_csv, load_roster_from_json, save_roster_to_csv, save_roster_to_json,
};
