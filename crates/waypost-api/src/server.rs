//! Plaintext and TLS listeners.
//!
//! Either or both listeners run against the same router. Each one runs in
//! its own task; the first one to fail takes the whole server down.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use waypost_core::config::GeneralConfig;
use waypost_core::error::WaypostError;

/// Resolve a listener address from the configured interface and port.
pub fn listen_addr(bind_address: &str, port: u16) -> Result<SocketAddr, WaypostError> {
    let ip: IpAddr = bind_address.parse().map_err(|e| {
        WaypostError::Config(format!("Invalid bind_address '{}': {}", bind_address, e))
    })?;
    Ok(SocketAddr::new(ip, port))
}

/// Load TLS configuration from PEM certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, WaypostError> {
    if !cert_path.exists() {
        return Err(WaypostError::Listener(format!(
            "Certificate file not found: {}",
            cert_path.display()
        )));
    }
    if !key_path.exists() {
        return Err(WaypostError::Listener(format!(
            "Private key file not found: {}",
            key_path.display()
        )));
    }

    // More than one rustls backend is linked in; pin the process default.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| WaypostError::Listener(format!("Failed to load TLS certificate: {}", e)))
}

/// Start the listeners enabled in `general` and serve until one fails.
///
/// Never returns `Ok` under normal operation; there is no graceful shutdown.
pub async fn serve(general: &GeneralConfig, router: Router) -> Result<(), WaypostError> {
    if !general.httpenabled && !general.sslenabled {
        return Err(WaypostError::Config(
            "Neither httpenabled nor sslenabled is set; nothing to serve".to_string(),
        ));
    }

    let mut listeners = JoinSet::new();

    if general.httpenabled {
        let addr = listen_addr(&general.bind_address, general.httpport)?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            WaypostError::Listener(format!("could not start http server on {}: {}", addr, e))
        })?;
        tracing::info!(addr = %addr, "HTTP listener started");

        let app = router.clone();
        listeners.spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .map_err(|e| WaypostError::Listener(format!("http server: {}", e)))
        });
    }

    if general.sslenabled {
        let addr = listen_addr(&general.bind_address, general.sslport)?;
        let tls = load_tls_config(Path::new(&general.sslcert), Path::new(&general.sslkey)).await?;
        tracing::info!(addr = %addr, "TLS listener starting");

        let app = router.clone();
        listeners.spawn(async move {
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .map_err(|e| {
                    WaypostError::Listener(format!("could not start ssl server on {}: {}", addr, e))
                })
        });
    }

    while let Some(joined) = listeners.join_next().await {
        joined.map_err(|e| WaypostError::Listener(format!("listener task failed: {}", e)))??;
    }

    Ok(())
}
