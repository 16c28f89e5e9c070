// tests/config_load.rs
use mapp_review_analyzer::config::{
    load_config_default, load_config_from, ENV_CONFIG_PATH, ENV_DAYS, ENV_OUTPUT_DIR,
    ENV_REVIEW_COUNT,
};
use std::path::PathBuf;
use std::{env, fs};

fn clear_env() {
    for k in [ENV_CONFIG_PATH, ENV_DAYS, ENV_REVIEW_COUNT, ENV_OUTPUT_DIR] {
        env::remove_var(k);
    }
}

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("mapp.toml");
    fs::write(
        &p_toml,
        r#"
review_count = 50
days = 14

[play_store]
package = "com.example.budget"

[app_store]
app_id = "123456789"
country = "de"
"#,
    )
    .unwrap();
    let c = load_config_from(&p_toml).unwrap();
    assert_eq!(c.review_count, 50);
    assert_eq!(c.days, 14);
    assert_eq!(c.play_store.package, "com.example.budget");
    assert_eq!(c.app_store.country, "de");

    let p_json = dir.path().join("mapp.json");
    fs::write(&p_json, r#"{"days": 3, "app_store": {"app_id": "42"}}"#).unwrap();
    let cj = load_config_from(&p_json).unwrap();
    assert_eq!(cj.days, 3);
    assert_eq!(cj.review_count, 200);
    assert_eq!(cj.app_store.app_id, "42");
    assert_eq!(cj.app_store.country, "us");
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not read.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing present -> defaults
    let c = load_config_default().unwrap();
    assert_eq!(c.days, 7);
    assert_eq!(c.review_count, 200);

    // 2) JSON fallback in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("mapp.json"), r#"{"days": 10}"#).unwrap();
    assert_eq!(load_config_default().unwrap().days, 10);

    // 3) TOML beats JSON
    fs::write(cfg_dir.join("mapp.toml"), "days = 21").unwrap();
    assert_eq!(load_config_default().unwrap().days, 21);

    // 4) Explicit path wins over both
    let p_env = tmp.path().join("elsewhere.toml");
    fs::write(&p_env, "days = 2\nreview_count = 5").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let ce = load_config_default().unwrap();
    assert_eq!(ce.days, 2);
    assert_eq!(ce.review_count, 5);

    // 5) Field overrides apply last
    env::set_var(ENV_DAYS, "30");
    env::set_var(ENV_OUTPUT_DIR, "reports");
    let co = load_config_default().unwrap();
    assert_eq!(co.days, 30);
    assert_eq!(co.review_count, 5);
    assert_eq!(co.output_dir, PathBuf::from("reports"));

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn bad_settings_are_rejected() {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_var(ENV_REVIEW_COUNT, "0");
    assert!(load_config_default().is_err());
    env::set_var(ENV_REVIEW_COUNT, "lots");
    assert!(load_config_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}
