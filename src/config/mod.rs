mod basic;
mod database;

pub use basic::BasicConfig;
pub use database::DatabaseConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Logging and process settings (see `basic` table in playerdb.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Backend selection and connection settings (see `database` table).
    #[serde(default)]
    pub database: DatabaseConfig,
}

pub const DEFAULT_CONFIG_FILE: &str = "playerdb.toml";

/// Environment overrides, e.g. `PLAYERDB_DATABASE__URL`.
pub const ENV_PREFIX: &str = "PLAYERDB_";

impl Config {
    /// Builds a Figment that merges defaults, the TOML file (if any) and the environment.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseType;

    #[test]
    fn defaults_without_file_or_env() {
        figment::Jail::expect_with(|_jail| {
            let cfg = Config::load()?;
            assert_eq!(cfg.basic.loglevel, "info");
            assert_eq!(cfg.database.backend, DatabaseType::Sqlite);
            assert!(cfg.database.wal);
            Ok(())
        });
    }

    #[test]
    fn toml_file_then_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [database]
                backend = "postgresql"
                url = "postgres://mt:mt@localhost/mt"
                "#,
            )?;
            jail.set_env("PLAYERDB_DATABASE__MAX_CONNECTIONS", "2");

            let cfg = Config::load()?;
            assert_eq!(cfg.database.backend, DatabaseType::Postgres);
            assert_eq!(cfg.database.url, "postgres://mt:mt@localhost/mt");
            assert_eq!(cfg.database.max_connections, 2);
            Ok(())
        });
    }

    #[test]
    fn unknown_backend_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PLAYERDB_DATABASE__BACKEND", "mysql");
            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("unsupported database backend"), "{err}");
            Ok(())
        });
    }
}
