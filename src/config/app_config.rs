use std::env;

use super::wait_config::WaitConfig;

pub struct AppConfig {
    pub config: WaitConfig,
    pub max_host_width: usize,
}

/// Load the application configuration from a YAML file and environment variables.
/// This function reads the configuration file specified by the `CONFIG_FILE` environment variable,
/// parses it into a `WaitConfig` struct, and overrides the upstream DNS server with the
/// `DNS_SERVER` environment variable when set.
pub fn load_config() -> AppConfig {
    let config_file_location = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yml".to_string());
    let config_str =
        std::fs::read_to_string(&config_file_location).expect("Failed to read config file");

    let mut config: WaitConfig = serde_yaml::from_str(&config_str).expect("Invalid YAML");

    if let Ok(server) = env::var("DNS_SERVER") {
        config.dns_server = server.trim().parse().expect("Invalid DNS_SERVER address");
    }

    log::info!("Using DNS server: {}", config.dns_server);

    let max_host_width = config
        .targets
        .iter()
        .map(|target| target.hostname.len())
        .max()
        .unwrap_or(10);

    AppConfig {
        config,
        max_host_width,
    }
}
