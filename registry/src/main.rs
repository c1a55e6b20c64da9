//! Rolekit Registry - Main Entry Point
//!
//! Loads the role catalog and, optionally, inspects a stored role set.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use rk_registry::{config, RoleRegistry, RoleSet};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rk_registry=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        role_dir = %config.role_dir.display(),
        "Starting role registry"
    );

    let registry = Arc::new(RoleRegistry::new());
    registry
        .load_dir(&config.role_dir)
        .with_context(|| format!("failed to load roles from {}", config.role_dir.display()))?;

    for role in registry.all() {
        info!(
            role = %role,
            tier = role.tier(),
            inherits = role.inherits_name().unwrap_or("-"),
            "Registered role"
        );
    }

    if let Some(path) = &config.state_file {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read role set {}", path.display()))?;
        let set = RoleSet::decode(Arc::clone(&registry), &config.state_format, &bytes)
            .with_context(|| format!("failed to decode role set {}", path.display()))?;

        match set.highest() {
            Some(highest) => info!(
                highest = %highest,
                display = %highest.coloured(highest.name()),
                roles = set.len(),
                "Inspected role set"
            ),
            None => info!("Inspected role set is empty"),
        }
    }

    Ok(())
}
