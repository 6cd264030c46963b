use std::str::FromStr;

use crate::error::{CatalogError, Result};
use crate::workflow::WorkflowParams;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "fleximart";
pub const DEFAULT_COLLECTION: &str = "products";

/// Where the catalog lives and what the workflow should ask of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub params: WorkflowParams,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            params: WorkflowParams::default(),
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    /// A first command line argument replaces `MONGODB_URI`.
    pub fn from_env() -> Result<Config> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        let mut config = Config::from_lookup(|key| std::env::var(key).ok())?;
        if let Some(uri) = std::env::args().nth(1) {
            config.uri = uri;
        }
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let params = defaults.params;

        Ok(Config {
            uri: lookup("MONGODB_URI").unwrap_or(defaults.uri),
            database: lookup("MONGODB_DATABASE").unwrap_or(defaults.database),
            collection: lookup("MONGODB_COLLECTION").unwrap_or(defaults.collection),
            params: WorkflowParams {
                category: lookup("CATALOG_CATEGORY").unwrap_or(params.category),
                price_ceiling: parse_or(&lookup, "CATALOG_PRICE_CEILING", params.price_ceiling)?,
                min_rating: parse_or(&lookup, "CATALOG_MIN_RATING", params.min_rating)?,
                product_id: lookup("CATALOG_PRODUCT_ID").unwrap_or(params.product_id),
                review: params.review,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| CatalogError::Config { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "fleximart");
        assert_eq!(config.collection, "products");
        assert_eq!(config.params.category, "Electronics");
        assert_eq!(config.params.price_ceiling, 50000.0);
        assert_eq!(config.params.min_rating, 4.0);
        assert_eq!(config.params.product_id, "ELEC001");
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://db.internal:27018"),
            ("MONGODB_DATABASE", "shop"),
            ("MONGODB_COLLECTION", "items"),
            ("CATALOG_CATEGORY", "Fashion"),
            ("CATALOG_PRICE_CEILING", " 1999.5 "),
            ("CATALOG_MIN_RATING", "3"),
            ("CATALOG_PRODUCT_ID", "FASH004"),
        ]))
        .unwrap();

        assert_eq!(config.uri, "mongodb://db.internal:27018");
        assert_eq!(config.database, "shop");
        assert_eq!(config.collection, "items");
        assert_eq!(config.params.category, "Fashion");
        assert_eq!(config.params.price_ceiling, 1999.5);
        assert_eq!(config.params.min_rating, 3.0);
        assert_eq!(config.params.product_id, "FASH004");
    }

    #[test]
    fn unparsable_number_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[("CATALOG_PRICE_CEILING", "cheap")])).unwrap_err();
        assert_matches!(
            err,
            CatalogError::Config { key: "CATALOG_PRICE_CEILING", ref value } if value == "cheap"
        );
    }
}
