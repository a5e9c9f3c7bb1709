use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use partstrack_auth::{
    AccountLifecycleManager, AccountStore, Branding, CredentialHasher, HashingConfig,
    LifecycleConfig, MailDelivery, SessionStore,
};
use partstrack_infra::seed::seed_demo_catalog;
use partstrack_infra::{
    AppConfig, InMemoryAccountStore, InMemoryCatalog, InMemorySessionStore, TracingMailer,
};
use partstrack_inventory::{InventoryCatalog, SalesLedger};
use partstrack_reporting::{PurchaseListExporter, ReportAggregator};

pub type Lifecycle =
    AccountLifecycleManager<Arc<dyn AccountStore>, Arc<dyn SessionStore>, Arc<dyn MailDelivery>>;
pub type Reports = ReportAggregator<Arc<dyn InventoryCatalog>, Arc<dyn SalesLedger>>;

/// Storage and transport backends the services are built on.
#[derive(Clone)]
pub struct Backends {
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub mailer: Arc<dyn MailDelivery>,
    pub catalog: Arc<dyn InventoryCatalog>,
    pub ledger: Arc<dyn SalesLedger>,
}

/// Application services shared by every handler.
pub struct AppServices {
    pub lifecycle: Lifecycle,
    pub reports: Reports,
    pub catalog: Arc<dyn InventoryCatalog>,
    pub exporter: PurchaseListExporter,
}

impl AppServices {
    pub fn new(
        backends: Backends,
        hasher: CredentialHasher,
        lifecycle: LifecycleConfig,
        strict_reorder_quantities: bool,
    ) -> Self {
        Self {
            lifecycle: AccountLifecycleManager::new(
                backends.accounts,
                backends.sessions,
                backends.mailer,
                hasher,
                lifecycle,
            ),
            reports: ReportAggregator::new(backends.catalog.clone(), backends.ledger),
            catalog: backends.catalog,
            exporter: PurchaseListExporter::new(strict_reorder_quantities),
        }
    }

    pub fn branding(&self) -> &Branding {
        self.lifecycle.branding()
    }
}

/// Wire in-memory backends from configuration, create the bootstrap
/// administrator and optionally seed the demo catalog.
pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let catalog = Arc::new(InMemoryCatalog::new());
    if config.seed_demo_data {
        seed_demo_catalog(&catalog).context("seeding demo catalog")?;
    }

    let backends = Backends {
        accounts: Arc::new(InMemoryAccountStore::new()),
        sessions: Arc::new(InMemorySessionStore::new()),
        mailer: Arc::new(TracingMailer::new(config.mail_sender.clone())),
        catalog: catalog.clone(),
        ledger: catalog,
    };

    let hasher = CredentialHasher::new(HashingConfig::default()).context("credential hasher")?;
    let services = AppServices::new(
        backends,
        hasher,
        config.lifecycle(),
        config.strict_reorder_quantities,
    );

    match &config.bootstrap_admin {
        Some(admin) => {
            let created = services
                .lifecycle
                .bootstrap_administrator(&admin.username, &admin.email, &admin.password)
                .context("creating bootstrap administrator")?;
            if created.is_none() {
                info!("administrator already present; bootstrap skipped");
            }
        }
        None => warn!("no bootstrap administrator configured; nobody can provision employees"),
    }

    Ok(services)
}
