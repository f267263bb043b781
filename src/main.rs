use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rentify::config::environment::EnvironmentConfig;
use rentify::database::{connection::create_pool, schema::init_schema};
use rentify::routes::create_app_router;
use rentify::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Rentify - Vehicle Rental Booking API");
    info!("=======================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = init_schema(&pool).await {
        error!("❌ Error inicializando el schema: {}", e);
        return Err(anyhow::anyhow!("Error de schema: {}", e));
    }
    info!("✅ Base de datos inicializada");

    let app_state = AppState::new(pool.clone(), config.clone());
    let app = create_app_router(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/auth/signup - Registrar usuario");
    info!("   POST /api/auth/signin - Login");
    info!("👤 Endpoints - Users:");
    info!("   GET    /api/users - Listar usuarios (admin)");
    info!("   PUT    /api/users/:id - Actualizar usuario");
    info!("   DELETE /api/users/:id - Eliminar usuario (admin)");
    info!("🚗 Endpoints - Vehicles:");
    info!("   POST   /api/vehicles - Crear vehículo (admin)");
    info!("   GET    /api/vehicles - Listar vehículos");
    info!("   GET    /api/vehicles/:id - Obtener vehículo");
    info!("   PUT    /api/vehicles/:id - Actualizar vehículo (admin)");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo (admin)");
    info!("📅 Endpoints - Bookings:");
    info!("   POST /api/bookings - Crear booking");
    info!("   GET  /api/bookings - Listar bookings por rol");
    info!("   PUT  /api/bookings/:id - Transicionar estado");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drenar el pool antes de salir
    pool.close().await;
    info!("👋 Servidor detenido");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Señal de apagado recibida, cerrando servidor...");
}
