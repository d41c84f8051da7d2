use qb_config::QbConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &QbConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &QbConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.backend.is_configured() && has_single_underscore_key(&env_keys, "QBANK_BACKEND") {
        warnings.push(
            "Backend config appears default while QBANK_BACKEND_* env vars exist. Use double underscores (example: QBANK_BACKEND__URL)."
                .to_string(),
        );
    }

    if config.auth.email_override().is_none() && has_single_underscore_key(&env_keys, "QBANK_AUTH")
    {
        warnings.push(
            "Auth config appears default while QBANK_AUTH_* env vars exist. Use double underscores (example: QBANK_AUTH__EMAIL)."
                .to_string(),
        );
    }

    warnings
}

fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    let single = format!("{section}_");
    let double = format!("{section}__");
    keys.iter()
        .any(|key| key.starts_with(&single) && !key.starts_with(&double))
}
