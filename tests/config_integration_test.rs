// ==========================================
// 配置集成测试
// ==========================================


use control_docs::api::ApiError;
use control_docs::config::config_keys;
use test_helpers::create_test_state;

#[test]
fn test_list_configs_includes_defaults() {
    let (_db, state) = create_test_state();

    let items = state.config_api.list_configs().unwrap();
    let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();

    assert_eq!(
        keys,
        vec![
            config_keys::OUTPUT_DIR,
            config_keys::DEFAULT_PLC_TYPE,
            config_keys::TIMESTAMP_FORMAT
        ]
    );
    assert_eq!(
        state.config_api.get_config(config_keys::DEFAULT_PLC_TYPE).unwrap().value,
        "Generic PLC"
    );
}

#[test]
fn test_invalid_timestamp_format_is_rejected() {
    let (_db, state) = create_test_state();

    let result = state
        .config_api
        .update_config(config_keys::TIMESTAMP_FORMAT, "%Y %");

    assert!(result.is_err());
    assert_eq!(
        state.config_api.get_config(config_keys::TIMESTAMP_FORMAT).unwrap().value,
        config_keys::DEFAULT_TIMESTAMP_FORMAT
    );
}

#[test]
fn test_unknown_key_without_value_is_not_found() {
    let (_db, state) = create_test_state();

    assert!(matches!(
        state.config_api.get_config("no.such.key"),
        Err(ApiError::NotFound(_))
    ));

    state.config_api.update_config("custom.key", "v").unwrap();
    assert_eq!(state.config_api.get_config("custom.key").unwrap().value, "v");
}
