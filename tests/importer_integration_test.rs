// ==========================================
// 导入集成测试
// ==========================================
// 测试目标: 文件 → 解析 → 映射 → SQLite 落库 的完整流程
// ==========================================


use control_docs::domain::IoType;
use control_docs::logging;
use std::io::Write;
use test_helpers::{create_test_project, create_test_state, fixture_path};

#[tokio::test]
async fn test_import_io_list_fixture() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Pump Station");

    let outcome = state
        .import_api
        .import_io_points(&project.id, &fixture_path("io_list.csv"))
        .await;

    assert!(outcome.success, "import failed: {:?}", outcome.error);
    assert_eq!(outcome.count, 4);

    let points = state.io_point_api.list_io_points(&project.id).unwrap();
    let tags: Vec<&str> = points.iter().map(|p| p.tag_name.as_str()).collect();
    assert_eq!(tags, vec!["FV-102", "LS-101", "P-101", "PT-101"]);

    let level = &points[1];
    assert_eq!(level.description, "Tank T-101 high level, alarm");
    assert_eq!(level.address, "%I0.0");
    assert_eq!(level.modbus_register, "10001");
    assert_eq!(level.normal_state, "Normally Closed");
    assert_eq!(level.range_min, 0.0);
    assert_eq!(level.range_max, 100.0);

    let pressure = &points[3];
    assert_eq!(pressure.io_type, IoType::Ai);
    assert_eq!(pressure.engineering_units, "bar");
    assert_eq!(pressure.range_max, 16.0);

    assert_eq!(points[0].io_type, IoType::Ao);
}

#[tokio::test]
async fn test_header_only_file_fails_with_reason() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Empty");

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Tag,Description,Type").unwrap();

    let outcome = state.import_api.import_io_points(&project.id, file.path()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.count, 0);
    assert!(!outcome.error.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_duplicate_tag_leaves_no_partial_data() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Dupes");

    let outcome = state
        .import_api
        .import_io_points_text(&project.id, "Tag,Type\nT1,DI\nT2,DO\nT1,AI\n")
        .await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("UNIQUE constraint failed: io_points.project_id, io_points.tag_name")
    );
    assert!(state.io_point_api.list_io_points(&project.id).unwrap().is_empty());
}

#[tokio::test]
async fn test_reimport_of_existing_tag_fails() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Twice");

    let first = state
        .import_api
        .import_io_points_text(&project.id, "Tag\nT1\n")
        .await;
    let second = state
        .import_api
        .import_io_points_text(&project.id, "Tag\nT1\n")
        .await;

    assert!(first.success);
    assert!(!second.success);
    assert!(second
        .error
        .unwrap()
        .starts_with("UNIQUE constraint failed"));
    assert_eq!(state.io_point_api.list_io_points(&project.id).unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_project_surfaces_storage_error() {
    logging::init_test();
    let (_db, state) = create_test_state();

    let outcome = state
        .import_api
        .import_io_points_text("no-such-project", "Tag\nT1\n")
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("FOREIGN KEY constraint failed"));
}

#[tokio::test]
async fn test_import_network_devices_fixture() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Network");

    let outcome = state
        .import_api
        .import_devices(&project.id, &fixture_path("network_devices.csv"))
        .await;

    assert!(outcome.success, "import failed: {:?}", outcome.error);
    assert_eq!(outcome.count, 2);

    let devices = state.io_point_api.list_devices(&project.id).unwrap();
    assert_eq!(devices[0].device_name, "HMI-01");
    assert_eq!(devices[0].device_type, "Other");
    assert_eq!(devices[0].subnet_mask, "255.255.0.0");
    assert_eq!(devices[1].device_name, "PLC-01");
    assert_eq!(devices[1].subnet_mask, "255.255.255.0");
    assert_eq!(devices[1].description, "Main controller, rack 1");
}

#[tokio::test]
async fn test_import_io_list_workbook() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Workbook");

    let outcome = state
        .import_api
        .import_io_points(&project.id, &fixture_path("io_list.xlsx"))
        .await;

    assert!(outcome.success, "import failed: {:?}", outcome.error);
    assert_eq!(outcome.count, 3);

    let points = state.io_point_api.list_io_points(&project.id).unwrap();
    let tags: Vec<&str> = points.iter().map(|p| p.tag_name.as_str()).collect();
    assert_eq!(tags, vec!["LS-101", "PT-101", "TT-201"]);

    assert_eq!(points[0].description, "Tank T-101 high level, alarm");
    assert_eq!(points[0].modbus_register, "10001");
    assert_eq!(points[0].range_max, 100.0);

    assert_eq!(points[1].io_type, IoType::Ai);
    assert_eq!(points[1].range_min, -1.5);
    assert_eq!(points[1].range_max, 16.0);

    assert_eq!(points[2].io_type, IoType::Ai);
    assert_eq!(points[2].engineering_units, "degC");
    assert_eq!(points[2].range_max, 150.0);
}
