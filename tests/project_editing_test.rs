// ==========================================
// 人工维护集成测试
// ==========================================
// 测试目标: I/O 点 / 因果规则的修改与生成物的联动
// ==========================================


use control_docs::api::{ApiError, ArtifactKind, IoPointPatch, RuleByTags, RulePatch};
use control_docs::domain::{IoType, LogicType, NewIoPoint};
use control_docs::logging;
use test_helpers::{create_test_project, create_test_state};

#[tokio::test]
async fn test_rename_io_point_keeps_rules_attached() {
    logging::init_test();
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Edit");
    state
        .io_point_api
        .add_io_point(&project.id, NewIoPoint::new("LS_101", IoType::Di))
        .unwrap();
    state
        .io_point_api
        .add_io_point(&project.id, NewIoPoint::new("P_101", IoType::Do))
        .unwrap();
    state
        .io_point_api
        .add_rule(
            &project.id,
            RuleByTags {
                cause_tag: "LS_101".to_string(),
                effect_tag: "P_101".to_string(),
                logic_type: LogicType::Direct,
                time_delay: 0.0,
                priority: 1,
                description: String::new(),
            },
        )
        .unwrap();

    let updated = state
        .io_point_api
        .update_io_point_by_tag(
            &project.id,
            "LS_101",
            IoPointPatch {
                tag_name: Some("LSH_101".to_string()),
                description: Some("Tank high high".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.tag_name, "LSH_101");
    assert_eq!(updated.io_type, IoType::Di);
    assert_eq!(updated.range_max, 100.0);

    let snapshot = state.artifact_api.load_snapshot(&project).unwrap();
    let ladder = state
        .artifact_api
        .render(ArtifactKind::LadderLogic, &snapshot)
        .await
        .unwrap();
    assert!(ladder.contains("P_101 := LSH_101;\n"));
}

#[test]
fn test_update_rule_by_tags() {
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Rules");
    for (tag, io_type) in [("A", IoType::Di), ("B", IoType::Di), ("Y", IoType::Do)] {
        state
            .io_point_api
            .add_io_point(&project.id, NewIoPoint::new(tag, io_type))
            .unwrap();
    }
    let rule = state
        .io_point_api
        .add_rule(
            &project.id,
            RuleByTags {
                cause_tag: "A".to_string(),
                effect_tag: "Y".to_string(),
                logic_type: LogicType::Direct,
                time_delay: 0.0,
                priority: 1,
                description: "start".to_string(),
            },
        )
        .unwrap();

    let updated = state
        .io_point_api
        .update_rule(
            &rule.id,
            RulePatch {
                cause_tag: Some("B".to_string()),
                logic_type: Some(LogicType::Not),
                time_delay: Some(3.0),
                ..Default::default()
            },
        )
        .unwrap();

    let b = state
        .io_point_api
        .list_io_points(&project.id)
        .unwrap()
        .into_iter()
        .find(|p| p.tag_name == "B")
        .unwrap();
    assert_eq!(updated.cause_id, b.id);
    assert_eq!(updated.effect_id, rule.effect_id);
    assert_eq!(updated.logic_type, LogicType::Not);
    assert_eq!(updated.time_delay, 3.0);
    assert_eq!(updated.description, "start");
    assert_eq!(state.io_point_api.list_rules(&project.id).unwrap(), vec![updated]);
}

#[test]
fn test_update_rule_rejects_unknown_tag_and_rule() {
    let (_db, state) = create_test_state();
    let project = create_test_project(&state, "Rules");
    state
        .io_point_api
        .add_io_point(&project.id, NewIoPoint::new("A", IoType::Di))
        .unwrap();
    let rule = state
        .io_point_api
        .add_rule(
            &project.id,
            RuleByTags {
                cause_tag: "A".to_string(),
                effect_tag: "A".to_string(),
                logic_type: LogicType::Direct,
                time_delay: 0.0,
                priority: 1,
                description: String::new(),
            },
        )
        .unwrap();

    let missing_tag = state.io_point_api.update_rule(
        &rule.id,
        RulePatch {
            effect_tag: Some("NOPE".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(missing_tag, Err(ApiError::NotFound(_))));

    let missing_rule = state
        .io_point_api
        .update_rule("no-such-rule", RulePatch::default());
    assert!(matches!(missing_rule, Err(ApiError::NotFound(_))));
}
