use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{CatalogService, CatalogStore};
use crate::core::{Config, Result, ServerError};
use crate::media::placeholder::ensure_placeholder;
use crate::media::{BannerWriter, ImageCleanupService, ImagePipeline, UploadPolicy};
use crate::notify::{NotificationSink, Notifier, TelegramSink};
use crate::promo::PromoStore;

/// Server state: shared handles to every service
///
/// Cloning is cheap; handlers receive a clone per request.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Arc<Config> | Immutable configuration |
/// | catalog | CatalogService | Products and their images |
/// | promos | PromoStore | Promo codes |
/// | banner | BannerWriter | Storefront banner |
/// | notifier | Notifier | Order / share messages |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub catalog: CatalogService,
    pub promos: PromoStore,
    pub banner: BannerWriter,
    pub notifier: Notifier,
    started_at: Instant,
}

fn prepare_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| ServerError::Prepare {
        path: path.to_path_buf(),
        source,
    })
}

impl ServerState {
    /// Build every service from `config`, delivering chat messages through
    /// the Telegram Bot API when `BOT_TOKEN` is set
    pub async fn initialize(config: &Config) -> Result<Self> {
        let sink: Option<Arc<dyn NotificationSink>> = match &config.bot_token {
            Some(token) => Some(Arc::new(TelegramSink::new(
                config.telegram_api_base.clone(),
                token.clone(),
                Duration::from_millis(config.request_timeout_ms),
            )?)),
            None => {
                tracing::warn!("BOT_TOKEN not set, order and share notifications are disabled");
                None
            }
        };
        Self::initialize_with_sink(config, sink).await
    }

    /// Same as [`initialize`](Self::initialize) with an explicit sink
    pub async fn initialize_with_sink(
        config: &Config,
        sink: Option<Arc<dyn NotificationSink>>,
    ) -> Result<Self> {
        // 1. Directories
        prepare_dir(&config.work_dir)?;
        prepare_dir(&config.images_dir)?;
        prepare_dir(&config.banner_dir)?;
        for file in [&config.products_file, &config.promo_file] {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                prepare_dir(parent)?;
            }
        }

        // 2. Placeholder asset
        ensure_placeholder(&config.placeholder_file)?;

        // 3. Services
        let policy = UploadPolicy::new(config.max_upload_bytes, config.max_images_per_product);
        let mut catalog = CatalogService::new(
            CatalogStore::new(&config.products_file),
            ImagePipeline::new(&config.images_dir, &config.images_public_prefix),
            policy,
            &config.placeholder_path,
        );
        if config.prune_orphan_images {
            catalog = catalog.with_cleanup(ImageCleanupService::new(config.images_dir.clone()));
        }

        let promos = PromoStore::new(&config.promo_file);
        let banner = BannerWriter::new(&config.banner_dir, &config.banner_public_path, policy);
        let notifier = Notifier::new(
            sink,
            config.manager_chat_id.clone(),
            config.bot_username.clone(),
        );

        if config.admin_token.is_none() {
            tracing::warn!("ADMIN_TOKEN not set, admin API will reject every request");
        }

        // 4. Seed an empty catalog once
        catalog.seed_if_empty().await?;

        Ok(Self {
            config: Arc::new(config.clone()),
            catalog,
            promos,
            banner,
            notifier,
            started_at: Instant::now(),
        })
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
