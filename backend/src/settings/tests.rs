//! Unit tests for settings parsing.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::rstest;

use super::*;

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

const RELEASE_MINIMUM: &[(&str, &str)] = &[(DATABASE_URL_ENV, "postgres://db/kuber")];

#[rstest]
fn debug_defaults_apply_to_an_empty_environment() {
    let settings = AppSettings::from_env(&mock_env(&[]), BuildMode::Debug).expect("settings");

    assert_eq!(settings.bind_addr, default_bind_addr());
    assert_eq!(settings.upstream_timeout, Duration::from_secs(5));
    assert_eq!(settings.backup_path, PathBuf::from("gold_data_backup.json"));
    assert!(settings.gemini.is_none());
    assert!(settings.gold_api.is_none());
    assert!(settings.database.is_none());
}

#[rstest]
fn release_requires_database_url() {
    let err = AppSettings::from_env(&mock_env(&[]), BuildMode::Release).expect_err("missing url");

    assert_eq!(
        err,
        SettingsError::MissingEnv {
            name: DATABASE_URL_ENV
        }
    );
}

#[rstest]
fn release_reads_every_variable() {
    let env = mock_env(&[
        (GEMINI_API_KEY_ENV, "gemini-key"),
        (GEMINI_MODEL_ENV, "gemini-2.0-flash"),
        (GOLD_API_KEY_ENV, "gold-key"),
        (GOLD_API_BASE_URL_ENV, "http://prices.internal/api"),
        (GOLD_BACKUP_PATH_ENV, "/srv/kuber/backup.json"),
        (DATABASE_URL_ENV, "postgres://db/kuber"),
        (DATABASE_MAX_CONNECTIONS_ENV, "4"),
        (UPSTREAM_TIMEOUT_ENV, "2"),
        (BIND_ADDR_ENV, "127.0.0.1:9000"),
    ]);

    let settings = AppSettings::from_env(&env, BuildMode::Release).expect("settings");

    let gemini = settings.gemini.expect("gemini configured");
    assert_eq!(gemini.api_key, "gemini-key");
    assert_eq!(gemini.model, "gemini-2.0-flash");
    let gold_api = settings.gold_api.expect("gold api configured");
    assert_eq!(gold_api.base_url.as_str(), "http://prices.internal/api");
    assert_eq!(settings.backup_path, PathBuf::from("/srv/kuber/backup.json"));
    assert_eq!(
        settings.database,
        Some(DatabaseSettings {
            url: "postgres://db/kuber".to_owned(),
            max_connections: 4,
        })
    );
    assert_eq!(settings.upstream_timeout, Duration::from_secs(2));
    assert_eq!(settings.bind_addr, "127.0.0.1:9000".parse().expect("addr"));
}

#[rstest]
fn gemini_model_defaults_when_only_key_is_set() {
    let env = mock_env(&[(GEMINI_API_KEY_ENV, "gemini-key")]);

    let settings = AppSettings::from_env(&env, BuildMode::Debug).expect("settings");

    assert_eq!(settings.gemini.expect("gemini").model, DEFAULT_GEMINI_MODEL);
}

#[rstest]
#[case::bind_addr(BIND_ADDR_ENV, "not-an-address")]
#[case::timeout(UPSTREAM_TIMEOUT_ENV, "soon")]
#[case::pool_size(DATABASE_MAX_CONNECTIONS_ENV, "-3")]
#[case::zero_pool(DATABASE_MAX_CONNECTIONS_ENV, "0")]
fn release_rejects_malformed_values(#[case] name: &'static str, #[case] value: &'static str) {
    let mut vars = RELEASE_MINIMUM.to_vec();
    vars.push((name, value));

    let err = AppSettings::from_env(&mock_env(&vars), BuildMode::Release).expect_err("invalid");

    assert!(matches!(err, SettingsError::InvalidEnv { name: reported, .. } if reported == name));
}

#[rstest]
fn release_rejects_malformed_gold_api_url() {
    let mut vars = RELEASE_MINIMUM.to_vec();
    vars.push((GOLD_API_KEY_ENV, "gold-key"));
    vars.push((GOLD_API_BASE_URL_ENV, "no scheme here"));

    let err = AppSettings::from_env(&mock_env(&vars), BuildMode::Release).expect_err("invalid");

    assert!(matches!(
        err,
        SettingsError::InvalidEnv {
            name: GOLD_API_BASE_URL_ENV,
            ..
        }
    ));
}

#[rstest]
#[case::bind_addr(BIND_ADDR_ENV, "not-an-address")]
#[case::timeout(UPSTREAM_TIMEOUT_ENV, "soon")]
#[case::zero_pool(DATABASE_MAX_CONNECTIONS_ENV, "0")]
fn debug_falls_back_to_defaults(#[case] name: &'static str, #[case] value: &'static str) {
    let mut vars = RELEASE_MINIMUM.to_vec();
    vars.push((name, value));

    let settings = AppSettings::from_env(&mock_env(&vars), BuildMode::Debug).expect("settings");

    assert_eq!(settings.bind_addr, default_bind_addr());
    assert_eq!(settings.upstream_timeout, DEFAULT_UPSTREAM_TIMEOUT);
    assert_eq!(
        settings.database.expect("database").max_connections,
        DEFAULT_MAX_CONNECTIONS
    );
}

#[rstest]
fn blank_values_count_as_unset() {
    let env = mock_env(&[(GOLD_API_KEY_ENV, "   "), (DATABASE_URL_ENV, "postgres://db")]);

    let settings = AppSettings::from_env(&env, BuildMode::Release).expect("settings");

    assert!(settings.gold_api.is_none());
}

#[rstest]
fn debug_output_hides_credentials() {
    let env = mock_env(&[
        (GEMINI_API_KEY_ENV, "gemini-secret"),
        (GOLD_API_KEY_ENV, "gold-secret"),
        (DATABASE_URL_ENV, "postgres://kuber:db-secret@db/kuber"),
    ]);

    let settings = AppSettings::from_env(&env, BuildMode::Release).expect("settings");
    let rendered = format!("{settings:?}");

    for secret in ["gemini-secret", "gold-secret", "db-secret"] {
        assert!(!rendered.contains(secret), "{secret} leaked: {rendered}");
    }
    assert!(rendered.contains(DEFAULT_GEMINI_MODEL));
    assert!(rendered.contains("max_connections"));
}
