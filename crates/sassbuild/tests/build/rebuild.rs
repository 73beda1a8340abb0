use sassbuild::ChangeSet;

use crate::harness::TestProject;

#[test_log::test]
fn non_incremental_empty_build_purges_stale_artifacts() {
    let project = TestProject::new();
    project.write_out("stale.css", "a{}");
    project.write_out("stale.css.map", "{}");
    project.write_out("deep/er/old.css", "a{}");
    project.write_out("robots.txt", "keep");

    let report = project.build(ChangeSet::rebuild()).unwrap();

    assert_eq!(report.purged, 3);
    assert!(!project.out("stale.css").exists());
    assert!(!project.out("stale.css.map").exists());
    assert!(!project.out("deep/er/old.css").exists());
    assert_eq!(project.read_out("robots.txt"), "keep");
}

#[test_log::test]
fn full_rebuild_regenerates_only_current_sources() {
    let project = TestProject::new();
    project.write_src("a.scss", "a { color: red; }");
    project.write_src("nested/b.scss", "b { color: red; }");
    project.write_out("gone.css", "a{}");

    let report = project
        .controller()
        .rebuild_all(&project.options)
        .unwrap();

    assert_eq!(report.compiled, 2);
    assert!(project.out("a.css").exists());
    assert!(project.out("nested/b.css").exists());
    assert!(!project.out("gone.css").exists());
}

#[test_log::test]
fn rebuild_with_missing_dest_root_is_fine() {
    let project = TestProject::new();
    let report = project.build(ChangeSet::rebuild()).unwrap();
    assert_eq!(report.purged, 0);
}
