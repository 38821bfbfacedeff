use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;

use backend_application::{AppState, Metrics};
use backend_domain::ports::TicketRepository;
use backend_infrastructure::{AppConfig, HttpPaymentGateway, PostgresStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .connect(&db_config.database_url)
            .await?;

        let store = Arc::new(PostgresStore::new(pool));
        store.ensure_schema().await?;

        let gateway = Arc::new(HttpPaymentGateway::new(&runtime_config)?);

        let state = AppState {
            config: runtime_config,
            ticket_repo: store.clone(),
            wallet_repo: store.clone(),
            withdrawal_repo: store.clone(),
            settlement_repo: store,
            gateway,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
