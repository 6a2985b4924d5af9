mod common;

use common::Clock;
use glide_core::{MotionError, Target, Value};
use glide_motion::{
    initial_style, motion, preset, register_motion, unregister_motion, use_motion,
    DirectiveRegistry, MotionOptions, MotionPluginConfig,
};
use serde_json::json;
use std::fs;

#[test]
fn preset_drives_a_subject() {
    let mut clock = Clock::new();
    let variants = preset("slideVisibleBottom").unwrap();
    let motion = use_motion(&clock.scheduler.handle(), None, variants, MotionOptions::default());
    motion.driver().mount(None);
    assert_eq!(motion.properties().get("y"), Some(Value::Number(100.0)));

    motion.driver().visibility(true);
    clock.settle();
    assert_eq!(motion.properties().get("y"), Some(Value::Number(0.0)));
    assert_eq!(motion.properties().get("opacity"), Some(Value::Number(1.0)));
}

#[test]
fn directive_delay_holds_enter() {
    let mut clock = Clock::new();
    let registry = DirectiveRegistry::new(&MotionPluginConfig::default());
    let attrs = json!({
        "preset": "fade",
        "enter": {"opacity": 1, "transition": {"duration": 100, "ease": "linear"}},
        "delay": 200
    });
    let variants = registry
        .resolve(None, attrs.as_object().unwrap())
        .unwrap();
    let motion = use_motion(&clock.scheduler.handle(), None, variants, MotionOptions::default());
    motion.driver().mount(None);

    clock.frames(12);
    assert_eq!(motion.properties().get("opacity"), Some(Value::Number(0.0)));
    clock.settle();
    assert_eq!(motion.properties().get("opacity"), Some(Value::Number(1.0)));
}

#[test]
fn ssr_renders_initial_state() {
    let variants = preset("rollLeft").unwrap();
    assert_eq!(
        initial_style(&variants),
        "opacity: 0; transform: translateX(-100px) rotate(10deg);"
    );
}

#[test]
fn config_file_feeds_directives() {
    let dir = std::env::temp_dir().join(format!("glide-config-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let toml_path = dir.join("glide.toml");
    fs::write(
        &toml_path,
        r#"
        excludePresets = true

        [directives.grow.initial]
        scale = 0.5

        [directives.grow.enter]
        scale = 1
        "#,
    )
    .unwrap();
    let config = MotionPluginConfig::load(&toml_path).unwrap();
    let registry = DirectiveRegistry::new(&config);
    assert!(registry.get("fade").is_none());
    let grow = registry.resolve(Some("grow"), &serde_json::Map::new()).unwrap();
    assert_eq!(grow["initial"].get("scale"), Some(&Target::from(0.5)));

    let json_path = dir.join("glide.json");
    fs::write(&json_path, r#"{"hardwareAcceleration": false}"#).unwrap();
    let config = MotionPluginConfig::load(&json_path).unwrap();
    assert!(!config.hardware_acceleration);
    assert_eq!(DirectiveRegistry::new(&config).len(), 20);

    fs::write(&json_path, "{").unwrap();
    assert!(matches!(
        MotionPluginConfig::load(&json_path),
        Err(MotionError::Json(_))
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn named_instances() {
    let clock = Clock::new();
    let instance = use_motion(
        &clock.scheduler.handle(),
        None,
        preset("pop").unwrap(),
        MotionOptions::default(),
    );
    register_motion("hero", instance);
    let found = motion("hero").unwrap();
    found.set("initial").unwrap();
    assert_eq!(found.properties().get("scale"), Some(Value::Number(0.0)));
    assert!(unregister_motion("hero").is_some());
    assert!(motion("hero").is_none());
}

#[test]
fn unknown_variant_is_reported() {
    let clock = Clock::new();
    let instance = use_motion(
        &clock.scheduler.handle(),
        None,
        preset("fade").unwrap(),
        MotionOptions::default(),
    );
    match instance.apply("wobble") {
        Err(MotionError::UnknownVariant(name)) => assert_eq!(name, "wobble"),
        other => panic!("expected unknown variant, got {other:?}"),
    }
}
