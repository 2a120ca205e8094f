use voyage_core::{format_flag, parse_flag, PreferenceStorage, StorageError};
use web_sys as web;

/// `PreferenceStorage` over `window.localStorage`. Private browsing modes may
/// hide or refuse storage; both surface as errors the store logs and ignores.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

fn local_storage() -> Result<web::Storage, StorageError> {
    web::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

impl PreferenceStorage for LocalStorage {
    fn read_flag(&self, key: &str) -> Result<Option<bool>, StorageError> {
        let raw = local_storage()?
            .get_item(key)
            .map_err(|_| StorageError::Read(key.to_string()))?;
        Ok(raw.as_deref().and_then(parse_flag))
    }

    fn write_flag(&self, key: &str, value: bool) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, format_flag(value))
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}
