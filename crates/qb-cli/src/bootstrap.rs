use anyhow::Context;
use qb_config::QbConfig;

/// Load configuration, reading `.env` from the current directory first.
pub fn load_config() -> anyhow::Result<QbConfig> {
    QbConfig::load_with_dotenv().context("failed to load qbank configuration")
}
