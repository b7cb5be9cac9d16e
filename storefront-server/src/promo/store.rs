//! Promo Store
//!
//! JSON object `code -> {discount, description}` on disk. Codes are stored
//! lowercase and looked up case-insensitively.

use indexmap::IndexMap;
use shared::models::{PromoCheck, PromoCode, PromoDescriptor};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use super::{PromoError, PromoResult};

pub type PromoMap = IndexMap<String, PromoDescriptor>;

fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct PromoStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl PromoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable file -> no promo codes
    pub async fn load(&self) -> PromoMap {
        match self.read().await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Promo file unreadable, treating as empty");
                PromoMap::new()
            }
        }
    }

    async fn read(&self) -> PromoResult<PromoMap> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PromoMap::new()),
            Err(e) => {
                return Err(PromoError::Persistence(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        if raw.trim().is_empty() {
            return Ok(PromoMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            PromoError::Persistence(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    pub async fn save(&self, promos: &PromoMap) -> PromoResult<()> {
        let json = serde_json::to_string_pretty(promos)
            .map_err(|e| PromoError::Persistence(format!("failed to serialize promo codes: {}", e)))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                PromoError::Persistence(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, json).await.map_err(|e| {
            PromoError::Persistence(format!("failed to write {}: {}", self.path.display(), e))
        })
    }

    pub async fn list(&self) -> Vec<PromoCode> {
        self.load()
            .await
            .into_iter()
            .map(|(code, d)| PromoCode {
                code,
                discount: d.discount,
                description: d.description,
            })
            .collect()
    }

    /// Public lookup; never fails
    pub async fn validate(&self, code: &str) -> PromoCheck {
        let key = normalize(code);
        if key.is_empty() {
            return PromoCheck::invalid();
        }
        // Keys written by hand may not be lowercase
        self.load()
            .await
            .into_iter()
            .find(|(k, _)| normalize(k) == key)
            .map(|(_, d)| PromoCheck::valid(d.discount))
            .unwrap_or_else(PromoCheck::invalid)
    }

    /// Create or overwrite a code
    pub async fn upsert(&self, code: &str, discount: f64, description: &str) -> PromoResult<PromoCode> {
        let key = normalize(code);
        if key.is_empty() {
            return Err(PromoError::Validation("promo code must not be empty".to_string()));
        }
        if !discount.is_finite() || discount <= 0.0 {
            return Err(PromoError::InvalidDiscount(discount));
        }

        let _guard = self.write_lock.lock().await;
        let mut promos = self.read().await?;
        promos.retain(|k, _| normalize(k) != key);
        promos.insert(
            key.clone(),
            PromoDescriptor {
                discount,
                description: description.trim().to_string(),
            },
        );
        self.save(&promos).await?;

        tracing::info!(code = %key, discount, "Promo code saved");
        Ok(PromoCode {
            code: key,
            discount,
            description: description.trim().to_string(),
        })
    }

    pub async fn remove(&self, code: &str) -> PromoResult<()> {
        let key = normalize(code);
        let _guard = self.write_lock.lock().await;
        let mut promos = self.read().await?;
        let before = promos.len();
        promos.retain(|k, _| normalize(k) != key);
        if promos.len() == before {
            return Err(PromoError::NotFound(key));
        }
        self.save(&promos).await?;

        tracing::info!(code = %key, "Promo code deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> PromoStore {
        PromoStore::new(dir.join("promo_codes.json"))
    }

    #[tokio::test]
    async fn test_upsert_then_validate_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let promos = store(dir.path());

        let saved = promos.upsert("SUMMER", 10.0, "Summer sale").await.unwrap();
        assert_eq!(saved.code, "summer");

        assert_eq!(promos.validate("summer").await, PromoCheck::valid(10.0));
        assert_eq!(promos.validate("  SuMmEr ").await, PromoCheck::valid(10.0));
        assert_eq!(promos.validate("winter").await, PromoCheck::invalid());
        assert_eq!(promos.validate("").await, PromoCheck::invalid());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_code() {
        let dir = tempfile::tempdir().unwrap();
        let promos = store(dir.path());
        promos.upsert("sale", 5.0, "first").await.unwrap();
        promos.upsert("SALE", 15.0, "second").await.unwrap();

        let list = promos.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].discount, 15.0);
        assert_eq!(list[0].description, "second");
    }

    #[tokio::test]
    async fn test_upsert_validation() {
        let dir = tempfile::tempdir().unwrap();
        let promos = store(dir.path());

        assert!(matches!(
            promos.upsert("   ", 10.0, "").await,
            Err(PromoError::Validation(_))
        ));
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                promos.upsert("x", bad, "").await,
                Err(PromoError::InvalidDiscount(_))
            ));
        }
        assert!(promos.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let promos = store(dir.path());
        promos.upsert("a", 1.0, "").await.unwrap();
        promos.upsert("b", 2.0, "").await.unwrap();

        promos.remove("A").await.unwrap();
        assert_eq!(promos.validate("a").await, PromoCheck::invalid());
        assert!(matches!(promos.remove("a").await, Err(PromoError::NotFound(_))));
        assert_eq!(promos.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_file_format_and_hand_written_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promo_codes.json");
        std::fs::write(&path, r#"{"WELCOME": {"discount": 7, "description": "hi"}}"#).unwrap();
        let promos = PromoStore::new(&path);

        assert_eq!(promos.validate("welcome").await, PromoCheck::valid(7.0));

        promos.upsert("next", 3.5, "").await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["next"]["discount"], 3.5);
        assert_eq!(raw["WELCOME"]["discount"], 7.0);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty_but_blocks_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promo_codes.json");
        std::fs::write(&path, "not json").unwrap();
        let promos = PromoStore::new(&path);

        assert_eq!(promos.validate("x").await, PromoCheck::invalid());
        assert!(matches!(
            promos.upsert("x", 1.0, "").await,
            Err(PromoError::Persistence(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }
}
