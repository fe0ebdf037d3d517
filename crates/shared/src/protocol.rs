use serde::Deserialize;

use crate::{domain::Product, error::CatalogError};

/// Response wrapper used by the catalog endpoint: `{ "record": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEnvelope<T> {
    pub record: T,
}

/// Parses a catalog payload, rejecting anything that is not a product list under `record`.
pub fn decode_catalog(body: &[u8]) -> Result<Vec<Product>, CatalogError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|err| CatalogError::Shape(format!("payload is not JSON: {err}")))?;

    let Some(record) = value.get("record") else {
        return Err(CatalogError::Shape("missing `record` field".to_string()));
    };
    if !record.is_array() {
        return Err(CatalogError::Shape("`record` is not a list".to_string()));
    }

    let envelope: CatalogEnvelope<Vec<Product>> = serde_json::from_value(value)
        .map_err(|err| CatalogError::Shape(format!("malformed product: {err}")))?;
    Ok(envelope.record)
}
