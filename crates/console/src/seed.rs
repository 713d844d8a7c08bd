//! Sample data loading.
//!
//! Reads users, stores and products from a YAML file and inserts them.
//! Stores name their manager by user name; the user IDs handed out by the
//! `Users` serial column are resolved while seeding.
//!
//! ```yaml
//! users:
//!   - name: carol
//!     password: pw2
//!     latitude: 40.0
//!     longitude: 40.0
//!     role: manager
//! stores:
//!   - id: 1
//!     name: Downtown
//!     latitude: 12.0
//!     longitude: 14.0
//!     manager: carol
//! products:
//!   - store: 1
//!     name: Widget
//!     units: 5
//!     price: "3.00"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument};

use marketplace_core::{Coordinates, Price, Role, StoreId};

use crate::db::{ProductRepository, RepositoryError, StoreRepository, UserRepository};
use crate::models::{NewUser, Product, Store};

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{} validation errors found: {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub users: Vec<SeedUser>,
    pub stores: Vec<SeedStore>,
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub password: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedStore {
    pub id: StoreId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Name of a user in the same file.
    pub manager: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub store: StoreId,
    pub name: String,
    pub units: i32,
    pub price: Price,
}

/// Counts of inserted rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub users: usize,
    pub stores: usize,
    pub products: usize,
}

/// Check cross references and duplicates before anything is written.
///
/// Returns one message per problem; an empty list means the file is usable.
#[must_use]
pub fn validate(file: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for user in &file.users {
        if !names.insert(user.name.as_str()) {
            errors.push(format!("duplicate user name {:?}", user.name));
        }
    }

    let mut stores = HashSet::new();
    for store in &file.stores {
        if !stores.insert(store.id) {
            errors.push(format!("duplicate store ID {}", store.id));
        }
        if !names.contains(store.manager.as_str()) {
            errors.push(format!(
                "store {} names unknown manager {:?}",
                store.id, store.manager
            ));
        }
    }

    let mut products = HashSet::new();
    for product in &file.products {
        if !stores.contains(&product.store) {
            errors.push(format!(
                "product {:?} references unknown store {}",
                product.name, product.store
            ));
        }
        if !products.insert((product.store, product.name.as_str())) {
            errors.push(format!(
                "duplicate product {:?} in store {}",
                product.name, product.store
            ));
        }
        if product.units < 0 {
            errors.push(format!("product {:?} has negative units", product.name));
        }
    }

    errors
}

/// Read and parse a seed file without validating it.
///
/// # Errors
///
/// Returns `SeedError::Io` if the file cannot be read and `SeedError::Parse`
/// if it is not a valid seed document.
pub async fn load(path: &Path) -> Result<SeedFile, SeedError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Validate and insert the contents of a seed file in one transaction.
///
/// # Errors
///
/// Returns `SeedError::Invalid` before writing anything if validation fails,
/// `SeedError::Repository` if an insert fails; nothing is kept in that case.
#[instrument(skip_all, fields(users = file.users.len(), stores = file.stores.len()))]
pub async fn seed(pool: &PgPool, file: &SeedFile) -> Result<SeedResult, SeedError> {
    let errors = validate(file);
    if !errors.is_empty() {
        return Err(SeedError::Invalid(errors));
    }

    let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

    let mut ids = HashMap::new();
    for user in &file.users {
        let role = user.role.as_deref().map_or(Role::Customer, Role::from_column);
        let new_user = NewUser {
            name: user.name.clone(),
            password: user.password.clone(),
            coordinates: Coordinates::new(user.latitude, user.longitude),
        };
        let id = UserRepository::insert_with_role(&mut *tx, &new_user, role).await?;
        ids.insert(user.name.as_str(), id);
    }

    for store in &file.stores {
        let manager_id = *ids
            .get(store.manager.as_str())
            .ok_or_else(|| SeedError::Invalid(vec![format!("unknown manager {:?}", store.manager)]))?;
        let store = Store {
            id: store.id,
            name: store.name.clone(),
            coordinates: Coordinates::new(store.latitude, store.longitude),
            manager_id,
        };
        StoreRepository::insert_with(&mut *tx, &store).await?;
    }

    for product in &file.products {
        let product = Product {
            store_id: product.store,
            name: product.name.clone(),
            units: product.units,
            price: product.price,
        };
        ProductRepository::insert_with(&mut *tx, &product).await?;
    }

    tx.commit().await.map_err(RepositoryError::from)?;

    let result = SeedResult {
        users: file.users.len(),
        stores: file.stores.len(),
        products: file.products.len(),
    };
    info!(?result, "Seeding complete");
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
users:
  - name: carol
    password: pw2
    latitude: 40
    longitude: 40
    role: manager
  - name: alice
    password: pw1
    latitude: 10
    longitude: 10
stores:
  - id: 1
    name: Downtown
    latitude: 12
    longitude: 14
    manager: carol
products:
  - store: 1
    name: Widget
    units: 5
    price: "3.00"
"#;

    #[test]
    fn test_parse_sample() {
        let file: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(file.users.len(), 2);
        assert_eq!(file.users[0].role.as_deref(), Some("manager"));
        assert_eq!(file.users[1].role, None);
        assert_eq!(file.stores[0].id, StoreId::new(1));
        assert_eq!(file.products[0].price.to_string(), "$3.00");
        assert!(validate(&file).is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let file: SeedFile = serde_yaml::from_str("users: []\n").unwrap();
        assert!(file.stores.is_empty());
        assert!(file.products.is_empty());
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let mut file: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        file.stores[0].manager = "dave".to_owned();
        file.products[0].store = StoreId::new(9);

        let errors = validate(&file);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("unknown manager \"dave\""));
        assert!(errors[1].contains("unknown store 9"));
    }

    #[test]
    fn test_validate_reports_duplicates() {
        let mut file: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        file.users[1].name = "carol".to_owned();

        let errors = validate(&file);
        assert_eq!(errors, vec!["duplicate user name \"carol\"".to_owned()]);
    }

    #[tokio::test]
    async fn test_bundled_sample_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("seed/sample.yaml");
        let file = load(&path).await.unwrap();
        assert!(validate(&file).is_empty());
        assert_eq!(file.users.len(), 5);
        assert_eq!(file.stores.len(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load(Path::new("does/not/exist.yaml")).await.unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[test]
    fn test_validate_reports_duplicate_products() {
        let mut file: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        file.products.push(SeedProduct {
            store: StoreId::new(1),
            name: "Widget".to_owned(),
            units: 2,
            price: Price::parse("1.00").unwrap(),
        });

        let errors = validate(&file);
        assert_eq!(errors, vec!["duplicate product \"Widget\" in store 1".to_owned()]);
    }

    #[test]
    fn test_negative_price_fails_to_parse() {
        let yaml = SAMPLE.replace("\"3.00\"", "\"-5.00\"");
        let err = serde_yaml::from_str::<SeedFile>(&yaml).unwrap_err();
        assert!(err.to_string().contains("price cannot be negative"));
    }
}
