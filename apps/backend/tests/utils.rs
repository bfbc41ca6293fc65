use std::sync::Arc;

use taskboard::db::{pg, Db, MemoryStore};
use taskboard::AppState;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

/// Test database container setup
#[allow(dead_code)]
pub struct TestDb {
    pub db: Db,
    postgres_container: testcontainers::ContainerAsync<Postgres>,
}

#[allow(dead_code)]
impl TestDb {
    /// Start a PostgreSQL container and run migrations against it
    pub async fn setup() -> anyhow::Result<Self> {
        // ================================ Start container ================================
        let postgres_container = Postgres::default()
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start PostgreSQL container: {}", e))?;

        let postgres_port = postgres_container
            .get_host_port_ipv4(5432)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get PostgreSQL port: {}", e))?;

        let postgres_host = postgres_container
            .get_host()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get PostgreSQL host: {}", e))?;

        // ================================ Connect and migrate ================================
        let postgres_url = format!(
            "postgres://postgres:postgres@{}:{}/postgres",
            postgres_host, postgres_port
        );

        let pool = pg::connect(&postgres_url, 5).await?;
        pg::migrate(&pool).await?;

        Ok(TestDb {
            db: Db::from_pool(pool),
            postgres_container,
        })
    }
}

#[allow(dead_code)]
pub struct TestServer {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a test HTTP server on a random available port, backed by an in-memory store
    pub async fn start() -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());

        // exact same wiring as main.rs, minus PostgreSQL
        let state = AppState::new(store.clone());
        let app = taskboard::create_app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let address = format!("http://{}", addr);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed to start");
        });

        // Give server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            store,
            state,
            shutdown_tx,
        })
    }

    /// Build a WebSocket URL for a path
    pub fn ws_url(&self, path: &str) -> String {
        format!("{}{}", self.address.replacen("http://", "ws://", 1), path)
    }

    /// Build full HTTP URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make a GET request
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(&self.url(path))
            .await
            .expect("Failed to make GET request")
    }

    /// Helper to get a reqwest client for more complex requests
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    pub async fn observer_count(&self) -> usize {
        self.state.publisher.broadcaster().observer_count().await
    }
}

/// Helper to wait for a condition with timeout
#[allow(dead_code)]
pub async fn wait_for<F, Fut>(mut condition: F, timeout_ms: u64) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    while start.elapsed().as_millis() < timeout_ms as u128 {
        if condition().await {
            return Ok(());
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
    }
    anyhow::bail!("Timeout waiting for condition")
}
