//! Configuration constants and profile loading for apihub
//!
//! Connection settings live in an INI profile file, one section per profile:
//!
//! ```ini
//! [default]
//! server = http://localhost:8080
//!
//! [staging]
//! server = https://hub.staging.example
//! insecure = true
//! ```
//!
//! Precedence for the server prefix, highest first: `--server`, the
//! `APIHUB_BASE_URL` environment variable, the profile, the built-in default.

use crate::cmd_args::CommandLineArgs;
use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;

/// Default profile file path for apihub
pub const DEFAULT_PROFILE_PATH: &str = "~/.apihub/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "APIHUB_PROFILE_PATH";

/// Environment variable name for overriding the server prefix
pub const BASE_URL_ENV_VAR: &str = "APIHUB_BASE_URL";

/// Server prefix used when nothing else is configured
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Connection settings for one catalog backend
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProfile {
    /// Section the settings came from
    pub name: String,
    /// Deployment prefix prepended to every request path
    pub server: String,
    /// Accept invalid TLS certificates
    pub insecure: bool,
}

impl CatalogProfile {
    /// Profile with built-in defaults
    pub fn blank(name: &str) -> Self {
        Self {
            name: name.to_string(),
            server: DEFAULT_SERVER.to_string(),
            insecure: false,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

/// Load a named profile from an INI file
///
/// A missing file or section yields `Ok(None)`; an unreadable file is an error.
pub fn load_profile(name: &str, path: &str) -> Result<Option<CatalogProfile>> {
    let expanded = shellexpand::tilde(path).to_string();
    if !Path::new(&expanded).exists() {
        tracing::debug!("Profile file '{}' does not exist", expanded);
        return Ok(None);
    }

    let ini = Ini::load_from_file(&expanded)
        .with_context(|| format!("Failed to read profile file '{expanded}'"))?;
    let Some(section) = ini.section(Some(name)) else {
        tracing::debug!("Profile '{}' not found in '{}'", name, expanded);
        return Ok(None);
    };

    let mut profile = CatalogProfile::blank(name);
    if let Some(server) = section.get("server") {
        profile.server = server.trim().to_string();
    }
    if let Some(insecure) = section.get("insecure") {
        profile.insecure = parse_flag(insecure);
    }
    tracing::debug!("Profile '{}' loaded, server: '{}'", name, profile.server);
    Ok(Some(profile))
}

/// Resolve the effective profile from the file, environment and command line
pub fn resolve_profile(cmd_args: &CommandLineArgs) -> Result<CatalogProfile> {
    let env_server = std::env::var_os(BASE_URL_ENV_VAR).and_then(|val| val.into_string().ok());
    resolve_profile_from(cmd_args, &get_profile_path(), env_server)
}

/// Resolve a profile from an explicit file path and environment override
pub fn resolve_profile_from(
    cmd_args: &CommandLineArgs,
    profile_path: &str,
    env_server: Option<String>,
) -> Result<CatalogProfile> {
    let profile_name = cmd_args.profile();
    tracing::debug!("Loading profile '{}' from '{}'", profile_name, profile_path);

    let mut profile = match load_profile(profile_name, profile_path)? {
        Some(profile) => profile,
        None => {
            tracing::debug!("Profile '{}' not found, using blank profile", profile_name);
            CatalogProfile::blank(profile_name)
        }
    };

    if let Some(server) = env_server {
        tracing::debug!("Server overridden by {}: '{}'", BASE_URL_ENV_VAR, server);
        profile.server = server;
    }
    if let Some(server) = cmd_args.server() {
        tracing::debug!("Server overridden on the command line: '{}'", server);
        profile.server = server.to_string();
    }
    Ok(profile)
}
