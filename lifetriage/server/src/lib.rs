pub mod config {
    use sea_orm::ConnectOptions;
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Config {
        pub database_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Connections the pool keeps open at steady state.
        #[serde(default = "default_pool_size")]
        pub pool_size: u32,
        /// Extra connections the pool may open under burst load.
        #[serde(default = "default_max_overflow")]
        pub max_overflow: u32,
        /// Seconds a connection may live before it is recycled.
        #[serde(default = "default_pool_recycle")]
        pub pool_recycle: u64,
        /// Whether to check a connection is alive before handing it out.
        #[serde(default = "default_pre_ping")]
        pub pre_ping: bool,
    }

    impl Config {
        /// Loads configuration from environment variables.
        ///
        /// Fails when `DATABASE_URL` is not set.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default().try_parsing(true))
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Upper bound on open connections.
        pub fn max_connections(&self) -> u32 {
            self.pool_size + self.max_overflow
        }

        /// Builds the sea-orm connection options for the configured pool.
        pub fn connect_options(&self) -> ConnectOptions {
            let mut options = ConnectOptions::new(self.database_url.clone());
            options
                .min_connections(self.pool_size)
                .max_connections(self.max_connections())
                .max_lifetime(Duration::from_secs(self.pool_recycle))
                .test_before_acquire(self.pre_ping)
                .sqlx_logging(false);
            options
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_pool_size() -> u32 {
        5
    }

    fn default_max_overflow() -> u32 {
        10
    }

    fn default_pool_recycle() -> u64 {
        300
    }

    fn default_pre_ping() -> bool {
        true
    }

}
pub mod category;
pub mod entities;
pub mod task;
pub mod web;
