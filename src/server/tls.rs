//! TLS material loading for the TLS listener.

use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;

/// Load a rustls server config from PEM files.
///
/// Missing files are reported up front so the listener logs a usable path
/// instead of a bare decoder error.
pub async fn load(tls: &TlsConfig) -> io::Result<RustlsConfig> {
    ensure_exists(&tls.cert_file, "certificate")?;
    ensure_exists(&tls.key_file, "private key")?;
    RustlsConfig::from_pem_file(&tls.cert_file, &tls.key_file).await
}

fn ensure_exists(path: &Path, what: &str) -> io::Result<()> {
    if path.as_os_str().is_empty() || !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("TLS {what} file not found: {}", path.display()),
        ));
    }
    Ok(())
}
