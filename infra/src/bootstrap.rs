//! Service graph construction
//!
//! Picks MySQL stores when `DATABASE_URL` is set and in-memory stores
//! otherwise, builds the SMS cascade and wires the core services together.

use std::sync::Arc;
use std::time::Duration;

use pv_core::repositories::{
    ChallengeRepository, InMemoryChallengeRepository, InMemoryLedgerRepository, LedgerRepository,
};
use pv_core::services::credential::CredentialHasher;
use pv_core::services::delivery::{DeliveryChannel, DeliveryGateway};
use pv_core::services::ledger::{AuditLedger, AuditLedgerConfig, AuditRecorder};
use pv_core::services::otp::{OtpLifecycleConfig, OtpLifecycleManager};
use pv_core::services::token::{TokenIssuer, TokenIssuerConfig};
use pv_shared::config::AppConfig;

use crate::database::{
    DatabasePool, MySqlChallengeRepository, MySqlLedgerRepository, PoolStatistics,
};
use crate::sms::build_channels;
use crate::InfrastructureError;

/// Shared handles to every trust-and-audit service
#[derive(Clone)]
pub struct TrustServices {
    pub otp: Arc<OtpLifecycleManager<dyn ChallengeRepository>>,
    pub ledger: Arc<AuditLedger<dyn LedgerRepository>>,
    pub tokens: Arc<TokenIssuer>,
    pub gateway: Arc<DeliveryGateway>,
    database: Option<DatabasePool>,
}

impl TrustServices {
    /// Wire services over the given stores and channels
    pub fn assemble(
        config: &AppConfig,
        challenges: Arc<dyn ChallengeRepository>,
        blocks: Arc<dyn LedgerRepository>,
        channels: Vec<Arc<dyn DeliveryChannel>>,
    ) -> Result<Self, InfrastructureError> {
        let hasher = Arc::new(CredentialHasher::from_config(&config.crypto)?);
        let tokens = Arc::new(TokenIssuer::new(TokenIssuerConfig::from(&config.jwt)));
        let gateway = Arc::new(DeliveryGateway::new(
            channels,
            Duration::from_secs(config.otp.delivery_timeout_seconds),
        ));

        let ledger = Arc::new(AuditLedger::new(
            blocks,
            AuditLedgerConfig::from(&config.ledger),
        ));
        let recorder: Arc<dyn AuditRecorder> = ledger.clone();

        let otp = Arc::new(OtpLifecycleManager::new(
            challenges,
            hasher,
            gateway.clone(),
            tokens.clone(),
            recorder,
            OtpLifecycleConfig::from(&config.otp),
        ));

        Ok(Self {
            otp,
            ledger,
            tokens,
            gateway,
            database: None,
        })
    }

    /// In-memory stores with the given channels
    pub fn in_memory(
        config: &AppConfig,
        channels: Vec<Arc<dyn DeliveryChannel>>,
    ) -> Result<Self, InfrastructureError> {
        Self::assemble(
            config,
            Arc::new(InMemoryChallengeRepository::new()),
            Arc::new(InMemoryLedgerRepository::new()),
            channels,
        )
    }

    /// Whether the backing store answers; always true for memory stores
    pub async fn storage_healthy(&self) -> bool {
        match &self.database {
            Some(pool) => pool.health_check().await.unwrap_or(false),
            None => true,
        }
    }

    /// Pool usage for the MySQL backend; `None` for memory stores
    pub fn storage_statistics(&self) -> Option<PoolStatistics> {
        self.database.as_ref().map(DatabasePool::get_statistics)
    }

    pub fn storage_backend(&self) -> &'static str {
        if self.database.is_some() {
            "mysql"
        } else {
            "memory"
        }
    }

    /// Close database connections, if any
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.database {
            pool.close().await;
        }
    }
}

/// Load configuration from `.env` and the process environment
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::from_env()
}

/// Build every service from configuration
pub async fn initialize(config: &AppConfig) -> Result<TrustServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services");

    let channels = build_channels(&config.sms);

    if config.database.url.is_some() {
        let pool = DatabasePool::new(config.database.clone()).await?;

        let challenges =
            MySqlChallengeRepository::new(pool.get_pool().clone(), pool.lock_timeout());
        challenges.ensure_schema().await?;
        let blocks = MySqlLedgerRepository::new(pool.get_pool().clone());
        blocks.ensure_schema().await?;

        let mut services =
            TrustServices::assemble(config, Arc::new(challenges), Arc::new(blocks), channels)?;
        services.database = Some(pool);

        tracing::info!(storage = "mysql", "Infrastructure services initialized");
        return Ok(services);
    }

    tracing::warn!("DATABASE_URL not set, challenges and audit blocks are kept in memory");

    let services = TrustServices::in_memory(config, channels)?;
    tracing::info!(storage = "memory", "Infrastructure services initialized");
    Ok(services)
}
