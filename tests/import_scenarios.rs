use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use plan_import::db::Database;
use plan_import::error::ImportError;
use plan_import::fields::{ConstraintKind, DependencyPolicy, Priority, TimeUnit};
use plan_import::importer::{ImportReport, ProjectFileImporter, RelationOutcome};
use plan_import::reader::reader_for_path;
use plan_import::task::{Task, TaskLength};

const HOUSE_PLAN: &str = r#"{
    "header": { "minutes_per_day": 480, "minutes_per_week": 2400, "days_per_month": 20 },
    "tasks": [
        { "id": 1, "name": "Foundation", "priority": 900, "children": [
            { "id": 2, "name": "Excavate", "start": "2024-04-01T08:00:00", "finish": "2024-04-03T17:00:00",
              "physical_percent_complete": 100.0, "priority": 600 },
            { "id": 3, "name": "Pour concrete", "start": "2024-04-04T08:00:00", "finish": "2024-04-05T17:00:00",
              "notes": "order mixer truck",
              "predecessors": [ { "source_task": 3, "target_task": 2, "type": "FS",
                                  "lag": { "duration": 8.0, "units": "hours" } } ] }
        ] },
        { "id": 4, "name": "Framing", "start": "2024-04-10T08:00:00", "finish": "2024-04-19T17:00:00",
          "hyperlink": "https://example.org/framing", "priority": 200,
          "predecessors": [ { "source_task": 4, "target_task": 3, "type": "SS",
                              "lag": { "duration": 3.0, "units": "elapsed_days" } },
                            { "source_task": 4, "target_task": 77, "type": "FS" } ] },
        { "id": 5, "name": "Inspection", "milestone": true,
          "start": "2024-04-19T17:00:00", "finish": "2024-04-19T17:00:00",
          "predecessors": [] }
    ]
}"#;

fn write_fixture(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn native() -> Database {
    Database::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), TimeUnit::Day)
}

fn run(db: &mut Database, path: &Path) -> Result<ImportReport, ImportError> {
    ProjectFileImporter::new(db, reader_for_path(path).unwrap()).run(path)
}

fn by_name<'d>(db: &'d Database, name: &str) -> &'d Task {
    db.tasks.iter().find(|t| t.name == name).unwrap()
}

#[test]
fn imports_house_plan() {
    plan_import::logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "house.json", HOUSE_PLAN);
    let mut db = native();

    let report = run(&mut db, &path).unwrap();
    assert_eq!(report.tasks_created, 5);
    assert_eq!(report.created(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.rejected(), 0);

    let foundation = by_name(&db, "Foundation");
    let excavate = by_name(&db, "Excavate");
    let pour = by_name(&db, "Pour concrete");
    let framing = by_name(&db, "Framing");
    let inspection = by_name(&db, "Inspection");

    assert_eq!(db.children(db.root_task()), &[foundation.id, framing.id, inspection.id]);
    assert_eq!(foundation.children, vec![excavate.id, pour.id]);
    assert_eq!(foundation.priority, Priority::Highest);
    assert_eq!(excavate.priority, Priority::High);
    assert_eq!(framing.priority, Priority::Lowest);
    assert_eq!(pour.priority, Priority::Normal);

    assert_eq!(excavate.duration, TaskLength::new(TimeUnit::Day, 3));
    assert_eq!(excavate.completion_percentage, 100.0);
    assert_eq!(pour.duration, TaskLength::new(TimeUnit::Day, 2));
    assert_eq!(pour.notes.as_deref(), Some("order mixer truck"));
    assert_eq!(framing.duration, TaskLength::new(TimeUnit::Day, 10));
    assert_eq!(framing.web_link.as_deref(), Some("https://example.org/framing"));
    assert_eq!(framing.start, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
    assert!(inspection.milestone);
    assert_eq!(inspection.duration, TaskLength::new(TimeUnit::Day, 1));

    let pour_deps = db.dependencies_of(pour.id);
    assert_eq!(pour_deps.len(), 1);
    assert_eq!(pour_deps[0].dependee, excavate.id);
    assert_eq!(pour_deps[0].constraint, ConstraintKind::FinishStart);
    assert_eq!(pour_deps[0].difference, Some(1));

    let framing_deps = db.dependencies_of(framing.id);
    assert_eq!(framing_deps.len(), 1);
    assert_eq!(framing_deps[0].dependee, pour.id);
    assert_eq!(framing_deps[0].constraint, ConstraintKind::StartStart);
    assert_eq!(framing_deps[0].difference, Some(3));
}

#[test]
fn weekly_projects_measure_in_weeks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "house.json", HOUSE_PLAN);
    let mut db = Database::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), TimeUnit::Week);

    run(&mut db, &path).unwrap();
    assert_eq!(by_name(&db, "Framing").duration, TaskLength::new(TimeUnit::Week, 2));
    assert_eq!(by_name(&db, "Inspection").duration, TaskLength::new(TimeUnit::Week, 1));
}

#[test]
fn unknown_relation_type_keeps_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let body = HOUSE_PLAN.replace(r#""type": "SS""#, r#""type": "XX""#);
    let path = write_fixture(dir.path(), "house.json", &body);
    let mut db = native();

    let err = run(&mut db, &path).unwrap_err();
    match err {
        ImportError::UnknownRelationType { relation_type, source_task, target_task } => {
            assert_eq!(relation_type, "XX");
            assert_eq!((source_task, target_task), (4, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(db.tasks.len(), 6);
    assert_eq!(db.dependencies.len(), 1);
}

#[test]
fn rejected_dependency_does_not_roll_back() {
    let dir = tempfile::tempdir().unwrap();
    let body = r#"{ "tasks": [
        { "id": 1, "name": "Parent", "children": [
            { "id": 2, "name": "Child", "predecessors": [ { "source_task": 2, "target_task": 1, "type": "FS" } ] }
        ] },
        { "id": 3, "name": "Other", "predecessors": [ { "source_task": 3, "target_task": 2, "type": "FF" } ] }
    ] }"#;
    let path = write_fixture(dir.path(), "nested.json", body);

    let mut db = native();
    let report = run(&mut db, &path).unwrap();
    assert_eq!(report.rejected(), 1);
    assert_eq!(report.created(), 1);
    assert_eq!(db.tasks.len(), 4);

    let mut db = native();
    let report = ProjectFileImporter::new(&mut db, reader_for_path(&path).unwrap())
        .with_policy(DependencyPolicy::Abort)
        .run(&path)
        .unwrap();
    assert!(report.aborted_dependencies);
    assert!(matches!(report.dependencies.as_slice(), [RelationOutcome::Rejected { .. }]));
    assert!(db.dependencies.is_empty());
    assert_eq!(db.tasks.len(), 4);
}

#[test]
fn imported_project_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "house.json", HOUSE_PLAN);
    let db_path = dir.path().join("project.json");

    let mut db = native();
    run(&mut db, &path).unwrap();
    db.save(&db_path).unwrap();

    let loaded = Database::load(&db_path).unwrap();
    assert_eq!(loaded.tasks.len(), db.tasks.len());
    assert_eq!(loaded.dependencies, db.dependencies);
    assert_eq!(by_name(&loaded, "Framing").children, by_name(&db, "Framing").children);
}
