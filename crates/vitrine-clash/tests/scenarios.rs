use std::cell::RefCell;
use std::rc::Rc;
use vitrine_base::{ModelId, ObjectId};
use vitrine_clash::session::GROUND_GRID_ID;
use vitrine_clash::{
    CollisionScanner, EmptyReason, Error, ModelSource, ReadyState, Result, ScanStatus,
    ScanStrategy, ViewerConfig, ViewerSession, scan,
};
use vitrine_geometry::{Aabb, Vec3};
use vitrine_scene::{MemoryScene, ModelDescription, ObjectFlags, ScenePort};

const UNIT: [f64; 6] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

fn id(text: &str) -> ObjectId {
    ObjectId::from(text)
}

fn model(text: &str) -> ModelId {
    ModelId::from(text)
}

/// Session with no configured sources: ready immediately, models loaded after.
fn ready_session(models: &[ModelDescription]) -> Result<ViewerSession<MemoryScene>> {
    let mut session = ViewerSession::new(MemoryScene::new(), ViewerConfig::default());
    for description in models {
        session.scene_mut().load_model(description)?;
        session.model_loaded(&description.id)?;
    }
    Ok(session)
}

fn flags(session: &ViewerSession<MemoryScene>, object: &str) -> ObjectFlags {
    session.scene().flags(&id(object)).unwrap_or_default()
}

#[test]
fn overlapping_models_report_one_entry() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("A").with_object("a1", Some(UNIT)),
        ModelDescription::new("B").with_object("b1", Some([0.5, 0.5, 0.5, 1.5, 1.5, 1.5])),
    ])?;

    let report = session.run_scan(Some(&model("A")))?;
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].object, id("a1"));
    assert_eq!(report.entries[0].colliding, vec![id("b1")]);
    Ok(())
}

#[test]
fn disjoint_models_report_no_overlap() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("A").with_object("a1", Some(UNIT)),
        ModelDescription::new("B").with_object("b1", Some([2.0, 2.0, 2.0, 3.0, 3.0, 3.0])),
    ])?;

    let report = session.run_scan(Some(&model("A")))?;
    assert_eq!(report.status, ScanStatus::Completed);
    assert!(report.entries.is_empty());
    assert_eq!(report.empty_reason(), Some(EmptyReason::NoOverlap));
    Ok(())
}

#[test]
fn single_model_has_nothing_to_compare() -> Result<()> {
    let mut session = ready_session(&[ModelDescription::new("A").with_object("a1", Some(UNIT))])?;
    let report = session.run_scan(Some(&model("A")))?;
    assert_eq!(report.status, ScanStatus::NoExternalObjects);
    assert_eq!(report.empty_reason(), Some(EmptyReason::NoOtherModels));
    assert_ne!(report.empty_reason(), Some(EmptyReason::NoOverlap));
    Ok(())
}

#[test]
fn original_transform_is_first_seen_position() -> Result<()> {
    let mut session = ready_session(&[ModelDescription::new("M")
        .with_position(Vec3::new(1.0, 2.0, 3.0))
        .with_object("m1", Some(UNIT))])?;
    let m = model("M");

    session
        .scene_mut()
        .set_model_transform(&m, vitrine_geometry::Transform::from_position(Vec3::new(9.0, 9.0, 9.0)));
    assert!(!session.register_model(&m)?);
    assert_eq!(
        session.transforms().original(&m).map(|t| t.position),
        Some(Vec3::new(1.0, 2.0, 3.0))
    );

    session.apply_transform(&m, Vec3::new(-4.0, 0.0, 0.5), 90.0)?;
    assert!(session.reset_transform(&m));
    assert_eq!(
        session.scene().model(&m).map(|handle| handle.transform.position),
        Some(Vec3::new(1.0, 2.0, 3.0))
    );
    Ok(())
}

#[test]
fn isolation_flags_focus_and_dims_the_rest() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("A")
            .with_object("a1", Some(UNIT))
            .with_object("a2", Some([4.0, 0.0, 0.0, 5.0, 1.0, 1.0])),
        ModelDescription::new("B")
            .with_object("b1", Some([0.5, 0.5, 0.5, 1.5, 1.5, 1.5]))
            .with_object("b2", None),
    ])?;
    session.scene_mut().set_objects_highlighted(&[id("a2")], true);
    session.scene_mut().set_objects_visible(&[id("b1")], false);

    session.isolate(&id("a1"), &[id("b1")])?;

    for focus in ["a1", "b1"] {
        let state = flags(&session, focus);
        assert!(state.visible && state.highlighted && !state.xrayed, "{focus}");
    }
    for other in ["a2", "b2"] {
        let state = flags(&session, other);
        assert!(state.xrayed && !state.highlighted, "{other}");
    }
    Ok(())
}

#[test]
fn isolate_entry_uses_stored_result() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("A").with_object("a1", Some(UNIT)),
        ModelDescription::new("B").with_object("b1", Some([1.0, 1.0, 1.0, 2.0, 2.0, 2.0])),
    ])?;
    session.run_scan(Some(&model("A")))?;
    session.isolate_entry(0)?;
    assert_eq!(
        session.scene().highlighted_object_ids(),
        vec![id("a1"), id("b1")]
    );
    assert!(matches!(
        session.isolate_entry(3),
        Err(Error::EntryOutOfRange { index: 3, len: 1 })
    ));
    Ok(())
}

#[test]
fn moved_model_is_picked_up_by_next_scan() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("A").with_object("a1", Some(UNIT)),
        ModelDescription::new("B").with_object("b1", Some(UNIT)),
    ])?;
    let (a, b) = (model("A"), model("B"));
    assert_eq!(session.run_scan(Some(&a))?.entries.len(), 1);

    session.apply_transform(&b, Vec3::new(10.0, 0.0, 0.0), 0.0)?;
    assert!(session.run_scan(Some(&a))?.entries.is_empty());

    session.reset_transform(&b);
    assert_eq!(session.run_scan(Some(&a))?.entries.len(), 1);
    Ok(())
}

#[test]
fn scans_are_deterministic_and_strategies_agree() -> Result<()> {
    let mut scene = MemoryScene::new();
    let mut seed: u64 = 0x5eed;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((seed >> 33) % 1000) as f64 / 50.0
    };
    for name in ["ARQ", "EST", "HID", "ELE"] {
        let mut description = ModelDescription::new(name);
        for idx in 0..40 {
            let (x, y, z) = (next(), next(), next());
            let (w, h, d) = (next() * 0.2, next() * 0.2, next() * 0.2);
            let aabb = if idx % 13 == 0 {
                None
            } else {
                Some([x, y, z, x + w, y + h, z + d])
            };
            description = description.with_object(format!("{name}-{idx}"), aabb);
        }
        scene.load_model(&description)?;
    }

    let target = model("EST");
    let first = scan(&scene, Some(&target));
    let second = scan(&scene, Some(&target));
    assert_eq!(first, second);
    assert!(!first.entries.is_empty());
    assert!(first.entries.iter().all(|entry| !entry.colliding.is_empty()));

    let swept = CollisionScanner::new(ScanStrategy::SweepX).scan(&scene, Some(&target));
    assert_eq!(swept.entries, first.entries);
    Ok(())
}

#[test]
fn loading_gates_scans_and_adds_ground_grid() -> Result<()> {
    let config = ViewerConfig {
        default_models: vec![
            ModelSource {
                id: model("A"),
                src: "assets/a.xkt".to_string(),
            },
            ModelSource {
                id: model("MISSING"),
                src: "assets/missing.xkt".to_string(),
            },
        ],
        ..ViewerConfig::default()
    };
    let mut session = ViewerSession::new(MemoryScene::new(), config);
    assert_eq!(session.ready_state(), ReadyState::Loading);
    assert!(matches!(session.run_scan(Some(&model("A"))), Err(Error::NotReady)));
    assert!(matches!(session.isolate(&id("a1"), &[]), Err(Error::NotReady)));

    session.source_checked(&model("A"), true);
    session.source_checked(&model("MISSING"), false);
    session
        .scene_mut()
        .load_model(&ModelDescription::new("A").with_object("a1", Some(UNIT)))?;
    assert!(!session.is_ready());
    session.model_loaded(&model("A"))?;
    assert!(session.is_ready());

    let grid = id(GROUND_GRID_ID);
    assert!(session.scene().object_ids().contains(&grid));
    assert_eq!(session.scene().meta_owner(&grid), None);

    // the grid overlaps a1 but has no owner, so there is still nothing to compare
    let report = session.run_scan(Some(&model("A")))?;
    assert_eq!(report.empty_reason(), Some(EmptyReason::NoOtherModels));
    Ok(())
}

#[test]
fn presets_become_the_original_transform() -> Result<()> {
    let config = ViewerConfig::from_json_str(
        r#"{ "model_transforms": { "IFC_SPDA": { "position": [0.1, 0, 13.8], "rotation": [0, 90, 0] } } }"#,
    )?;
    let mut session = ViewerSession::new(MemoryScene::new(), config);
    session
        .scene_mut()
        .load_model(&ModelDescription::new("IFC_SPDA").with_object("rod", Some(UNIT)))?;
    session.model_loaded(&model("IFC_SPDA"))?;

    let original = session.transforms().original(&model("IFC_SPDA"));
    assert_eq!(original.map(|t| t.position), Some(Vec3::new(0.1, 0.0, 13.8)));
    assert_eq!(original.map(|t| t.rotation.y), Some(90.0));
    assert_eq!(session.collision_target(), Some(&model("IFC_SPDA")));
    Ok(())
}

#[test]
fn listener_receives_count_and_reason() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("A").with_object("a1", Some(UNIT)),
        ModelDescription::new("B").with_object("b1", Some(UNIT)),
    ])?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.set_results_listener(move |count, reason| sink.borrow_mut().push((count, reason)));

    session.run_scan(Some(&model("A")))?;
    session.run_scan(None)?;
    session.run_scan(Some(&model("Z")))?;

    assert_eq!(
        *seen.borrow(),
        vec![
            (1, None),
            (0, Some(EmptyReason::NoModelSelected)),
            (0, Some(EmptyReason::NoObjectsInModel)),
        ]
    );
    assert!(session.results().is_empty());
    Ok(())
}

#[test]
fn grid_box_follows_scene_bounds() -> Result<()> {
    let config = ViewerConfig {
        default_models: vec![ModelSource {
            id: model("A"),
            src: "a.xkt".to_string(),
        }],
        grid_size: 10.0,
        ..ViewerConfig::default()
    };
    let mut session = ViewerSession::new(MemoryScene::new(), config);
    session.source_checked(&model("A"), true);
    session.scene_mut().load_model(
        &ModelDescription::new("A").with_object("a1", Some([0.0, -2.0, 0.0, 4.0, 1.0, 2.0])),
    )?;
    session.model_loaded(&model("A"))?;
    assert_eq!(
        session.scene().aabb(&id(GROUND_GRID_ID)),
        Some(Aabb::from_array([-3.0, -2.0, -4.0, 7.0, -2.0, 6.0]))
    );
    Ok(())
}

#[test]
fn loaded_model_without_objects_has_nothing_to_scan() -> Result<()> {
    let mut session = ready_session(&[
        ModelDescription::new("EMPTY"),
        ModelDescription::new("B").with_object("b1", Some(UNIT)),
    ])?;
    let report = session.run_scan(Some(&model("EMPTY")))?;
    assert_eq!(report.status, ScanStatus::NoObjectsInModel);
    assert_eq!(report.empty_reason(), Some(EmptyReason::NoObjectsInModel));
    assert_eq!(report.target_objects, 0);
    Ok(())
}

#[test]
fn model_object_named_like_the_grid_is_kept() -> Result<()> {
    let config = ViewerConfig {
        default_models: vec![
            ModelSource {
                id: model("A"),
                src: "a.xkt".to_string(),
            },
            ModelSource {
                id: model("B"),
                src: "b.xkt".to_string(),
            },
        ],
        ..ViewerConfig::default()
    };
    let mut session = ViewerSession::new(MemoryScene::new(), config);
    session.source_checked(&model("A"), true);
    session.source_checked(&model("B"), true);
    session
        .scene_mut()
        .load_model(&ModelDescription::new("A").with_object(GROUND_GRID_ID, Some(UNIT)))?;
    session.model_loaded(&model("A"))?;
    session
        .scene_mut()
        .load_model(&ModelDescription::new("B").with_object("b1", Some(UNIT)))?;
    session.model_loaded(&model("B"))?;
    assert!(session.is_ready());

    let grid = id(GROUND_GRID_ID);
    assert_eq!(session.scene().meta_owner(&grid), Some(model("A")));
    assert_eq!(session.scene().aabb(&grid), Some(Aabb::from_array(UNIT)));

    let report = session.run_scan(Some(&model("B")))?;
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].colliding, vec![grid]);
    Ok(())
}
