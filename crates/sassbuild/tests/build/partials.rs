use sassbuild::ChangeSet;

use crate::harness::TestProject;

#[test_log::test]
fn partials_never_produce_output() {
    let project = TestProject::new();
    project.write_src("_colors.scss", "$brand: #336699;\n");
    project.write_src("main.scss", "@import 'colors';\nbody { color: $brand; }\n");

    let report = project
        .build(
            ChangeSet::incremental()
                .with(project.added("_colors.scss"))
                .with(project.added("main.scss")),
        )
        .unwrap();

    assert_eq!(report.compiled, 1);
    assert_eq!(report.skipped, 1);
    assert!(!project.out("_colors.css").exists());
    assert!(!project.out("_colors.css.map").exists());
    assert!(project.read_out("main.css").contains("#336699"));
}

#[test_log::test]
fn modified_partial_alone_changes_nothing() {
    let project = TestProject::new();
    project.write_src("_colors.scss", "$brand: red;\n");

    let report = project
        .build(ChangeSet::incremental().with(project.modified("_colors.scss")))
        .unwrap();

    assert_eq!(report.compiled, 0);
    assert!(!project.out("_colors.css").exists());
}

#[test_log::test]
fn full_rebuild_skips_partials() {
    let project = TestProject::new();
    project.write_src("_mixins.scss", "@mixin m { color: red; }\n");
    project.write_src("site.scss", "@import 'mixins';\na { @include m; }\n");

    let report = project
        .controller()
        .rebuild_all(&project.options)
        .unwrap();

    assert_eq!(report.compiled, 1);
    assert!(project.out("site.css").exists());
    assert!(!project.out("_mixins.css").exists());
}
