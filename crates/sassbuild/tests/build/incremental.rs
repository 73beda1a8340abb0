use sassbuild::{BuildError, ChangeSet};

use crate::harness::TestProject;

#[test_log::test]
fn added_source_is_compiled_with_map() {
    let project = TestProject::new();
    project.write_src("main.scss", "body { color: red; }");

    let report = project
        .build(ChangeSet::incremental().with(project.added("main.scss")))
        .unwrap();

    assert_eq!(report.compiled, 1);
    let css = project.read_out("main.css");
    assert!(css.contains("color: red"), "{css}");
    assert!(css.contains("sourceMappingURL=main.css.map"), "{css}");

    let map: serde_json::Value = serde_json::from_str(&project.read_out("main.css.map")).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "main.css");
    assert_eq!(map["sources"][0], "../src/main.scss");
}

#[test_log::test]
fn modified_source_replaces_output() {
    let project = TestProject::new();
    project.write_src("main.scss", "body { color: red; }");
    project
        .build(ChangeSet::incremental().with(project.added("main.scss")))
        .unwrap();

    project.write_src("main.scss", "body { color: blue; }");
    project
        .build(ChangeSet::incremental().with(project.modified("main.scss")))
        .unwrap();

    let css = project.read_out("main.css");
    assert!(css.contains("color: blue"), "{css}");
    assert!(!css.contains("color: red"), "{css}");
}

#[test_log::test]
fn removed_source_deletes_artifacts() {
    let project = TestProject::new();
    project.write_src("main.scss", "body { color: red; }");
    project
        .build(ChangeSet::incremental().with(project.added("main.scss")))
        .unwrap();
    assert!(project.out("main.css.map").exists());

    project.remove_src("main.scss");
    let report = project
        .build(ChangeSet::incremental().with(project.removed("main.scss")))
        .unwrap();

    assert_eq!(report.removed, 1);
    assert!(!project.out("main.css").exists());
    assert!(!project.out("main.css.map").exists());
}

#[test_log::test]
fn removing_twice_is_harmless() {
    let project = TestProject::new();
    let changes = || ChangeSet::incremental().with(project.removed("never/existed.scss"));

    project.build(changes()).unwrap();
    project.build(changes()).unwrap();

    assert!(!project.out("never/existed.css").exists());
}

#[test_log::test]
fn nested_sources_keep_their_directories() {
    let project = TestProject::new();
    project.write_src("themes/dark/site.sass", "a\n  color: black\n");

    project
        .build(ChangeSet::incremental().with(project.added("themes/dark/site.sass")))
        .unwrap();

    let css = project.read_out("themes/dark/site.css");
    assert!(css.contains("color: black"), "{css}");
}

#[test_log::test]
fn identical_rebuild_is_byte_identical() {
    let project = TestProject::new();
    project.write_src("main.scss", "$c: red;\nbody { color: $c; }\n");
    let changes = || ChangeSet::incremental().with(project.modified("main.scss"));

    project.build(changes()).unwrap();
    let first = project.read_out("main.css");
    let report = project.build(changes()).unwrap();

    assert_eq!(project.read_out("main.css"), first);
    assert_eq!(report.written, 0);
}

#[test_log::test]
fn syntax_error_fails_the_build_with_location() {
    let project = TestProject::new();
    project.write_src("ok.scss", "a { color: red; }");
    project.write_src("broken.scss", "a {\n  color: red;\n");
    project.write_src("later.scss", "b { color: red; }");

    let err = project
        .build(
            ChangeSet::incremental()
                .with(project.added("ok.scss"))
                .with(project.added("broken.scss"))
                .with(project.added("later.scss")),
        )
        .unwrap_err();

    let BuildError::Compilation(err) = err else {
        panic!("expected a compilation error, got {err:?}");
    };
    assert!(err.file.ends_with("broken.scss"), "{err}");
    assert!(err.line >= 1);
    assert!(project.out("ok.css").exists());
    assert!(!project.out("broken.css").exists());
    assert!(!project.out("later.css").exists());
}

#[test_log::test]
fn maps_disabled_writes_css_only() {
    let mut project = TestProject::new();
    project.options.source_map.enabled = false;
    project.write_src("main.scss", "body { color: red; }");

    project
        .build(ChangeSet::incremental().with(project.added("main.scss")))
        .unwrap();

    assert!(!project.read_out("main.css").contains("sourceMappingURL"));
    assert!(!project.out("main.css.map").exists());
}
