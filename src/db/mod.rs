#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use postgres::PgStore;
use repository::{
    ActivityRepository, AttendanceRepository, ChildRepository, FeeRepository, HealthProbe,
    StaffRepository, UserRepository,
};

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded from ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// The stores a request may touch, injected into the application state.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub children: Arc<dyn ChildRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub fees: Arc<dyn FeeRepository>,
    pub probe: Arc<dyn HealthProbe>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            staff: store.clone(),
            children: store.clone(),
            attendance: store.clone(),
            activities: store.clone(),
            fees: store.clone(),
            probe: store,
        }
    }
}
