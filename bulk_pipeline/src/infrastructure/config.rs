// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Layered Configuration Loading
//!
//! Produces a [`bulk_pipeline_domain::PipelineConfig`] from the layered
//! precedence every component in this workspace follows: built-in
//! defaults, an optional config file (TOML/YAML/JSON, auto-detected by
//! extension), environment variables prefixed `BULK_PIPELINE_`, and
//! finally explicit CLI overrides applied by the caller on top of the
//! returned value.

use ::config::{Config, Environment, File};

use bulk_pipeline_domain::{PipelineConfig, PipelineError};

pub const ENV_PREFIX: &str = "BULK_PIPELINE";

/// Loads configuration from `path` (if given) layered over defaults and
/// `BULK_PIPELINE_*` environment variables. A missing `path` is not an
/// error — defaults plus environment are a complete configuration.
pub fn load(path: Option<&str>) -> Result<PipelineConfig, PipelineError> {
    let defaults = PipelineConfig::default();

    let mut builder = Config::builder()
        .set_default("chunk_size", defaults.chunk_size as i64)
        .map_err(config_err)?
        .set_default("max_records", defaults.max_records as i64)
        .map_err(config_err)?
        .set_default("max_file_size_mib", defaults.max_file_size_mib as i64)
        .map_err(config_err)?
        .set_default("concurrency", defaults.concurrency as i64)
        .map_err(config_err)?
        .set_default("max_poll_records", defaults.max_poll_records as i64)
        .map_err(config_err)?
        .set_default("max_attempts", defaults.max_attempts as i64)
        .map_err(config_err)?
        .set_default("initial_interval_ms", defaults.initial_interval_ms as i64)
        .map_err(config_err)?
        .set_default("multiplier", defaults.multiplier)
        .map_err(config_err)?
        .set_default("max_interval_ms", defaults.max_interval_ms as i64)
        .map_err(config_err)?
        .set_default("producer_send_timeout_s", defaults.producer_send_timeout_s as i64)
        .map_err(config_err)?
        .set_default("cache_ttl_minutes", defaults.cache_ttl_minutes as i64)
        .map_err(config_err)?
        .set_default("batch_ttl_hours", defaults.batch_ttl_hours as i64)
        .map_err(config_err)?
        .set_default("dlt_ttl_days", defaults.dlt_ttl_days as i64)
        .map_err(config_err)?;

    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path).required(false));
    }
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("_"));

    let config = builder.build().map_err(config_err)?;
    config.try_deserialize().map_err(config_err)
}

fn config_err(err: ::config::ConfigError) -> PipelineError {
    PipelineError::configuration_error(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults_when_nothing_else_is_set() {
        let config = load(None).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn environment_variable_overrides_a_default() {
        std::env::set_var("BULK_PIPELINE_CHUNK_SIZE", "250");
        let config = load(None).unwrap();
        std::env::remove_var("BULK_PIPELINE_CHUNK_SIZE");
        assert_eq!(config.chunk_size, 250);
    }
}
