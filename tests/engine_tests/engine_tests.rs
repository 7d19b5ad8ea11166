//! Tests for Engine
//!
//! These tests verify:
//! - The session gate blocks every operation until admitted
//! - Loading and filtering the view
//! - View editing (edit, push, remove) and saving back
//! - Adding records through the engine
//! - Command execution
//! - Export of the current view

use chrono::NaiveDate;
use reserves::command::{Command, Outcome};
use reserves::config::Config;
use reserves::engine::Engine;
use reserves::session::CredentialCheck;
use reserves::{Field, Filter, Record, RecordStore, ReserveError};
use tempfile::TempDir;

const PASSWORD: &str = "admin123";

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_register() -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .workbook_path(temp_dir.path().join("Sommaire_Projet_Reserves.xlsx"))
        .export_path(temp_dir.path().join("export_reserves.pdf"))
        .build();

    let mut store = RecordStore::create(&config.workbook_path, &config.sheet_name).unwrap();
    store
        .append(Record::new("R1", "leak", "2024-01-01", "", "en cours"))
        .unwrap();
    store
        .append(Record::new("R2", "crack", "2024-02-01", "2024-03-01", "levée"))
        .unwrap();

    (temp_dir, config)
}

fn setup_unlocked_engine() -> (TempDir, Engine) {
    let (temp_dir, config) = setup_temp_register();
    let mut engine = Engine::open(config);
    assert!(engine.unlock(PASSWORD).unwrap());
    (temp_dir, engine)
}

fn stored(engine: &Engine) -> Vec<Record> {
    RecordStore::open(&engine.config().workbook_path, &engine.config().sheet_name)
        .unwrap()
        .records()
        .to_vec()
}

// =============================================================================
// Session Gate Tests
// =============================================================================

#[test]
fn test_locked_engine_refuses_everything() {
    let (_temp, config) = setup_temp_register();
    let mut engine = Engine::open(config);

    assert!(!engine.is_authenticated());
    assert!(matches!(engine.view(), Err(ReserveError::Auth)));
    assert!(matches!(engine.reload(), Err(ReserveError::Auth)));
    assert!(matches!(engine.set_filter(Filter::all()), Err(ReserveError::Auth)));
    assert!(matches!(engine.edit(0, Field::Status, "levée"), Err(ReserveError::Auth)));
    assert!(matches!(engine.push_row(Record::default()), Err(ReserveError::Auth)));
    assert!(matches!(engine.remove_row(0), Err(ReserveError::Auth)));
    assert!(matches!(
        engine.add(Record::new("R3", "", "2024-01-01", "", "")),
        Err(ReserveError::Auth)
    ));
    assert!(matches!(engine.save(), Err(ReserveError::Auth)));
    assert!(matches!(engine.export(), Err(ReserveError::Auth)));
    assert!(matches!(engine.status_choices(), Err(ReserveError::Auth)));
}

#[test]
fn test_wrong_passwords_keep_engine_locked() {
    let (_temp, config) = setup_temp_register();
    let mut engine = Engine::open(config);

    for attempt in ["admin", "Admin123", "admin1234"] {
        assert!(matches!(engine.unlock(attempt), Err(ReserveError::Auth)));
        assert!(!engine.is_authenticated());
    }
    assert!(matches!(engine.view(), Err(ReserveError::Auth)));
}

#[test]
fn test_locked_engine_does_not_touch_the_register() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .workbook_path(temp_dir.path().join("missing.xlsx"))
        .build();
    let mut engine = Engine::open(config);

    // The register is only opened after admission, so no I/O error here
    assert!(matches!(engine.unlock("nope"), Err(ReserveError::Auth)));
    assert!(!matches!(engine.unlock(PASSWORD), Err(ReserveError::Auth)));
}

#[test]
fn test_empty_password_is_not_an_attempt() {
    let (_temp, config) = setup_temp_register();
    let mut engine = Engine::open(config);

    assert!(!engine.unlock("").unwrap());
    assert!(!engine.is_authenticated());
}

#[test]
fn test_custom_credential_check() {
    struct Pin;

    impl CredentialCheck for Pin {
        fn verify(&self, secret: &str) -> bool {
            secret == "1234"
        }
    }

    let (_temp, config) = setup_temp_register();
    let mut engine = Engine::with_credentials(config, Pin);

    assert!(matches!(engine.unlock(PASSWORD), Err(ReserveError::Auth)));
    assert!(engine.unlock("1234").unwrap());
    assert_eq!(engine.view().unwrap().len(), 2);
}

// =============================================================================
// View Tests
// =============================================================================

#[test]
fn test_unlock_loads_view() {
    let (_temp, engine) = setup_unlocked_engine();

    let view = engine.view().unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].id, "R1");
    assert_eq!(view[1].id, "R2");
}

#[test]
fn test_set_filter_by_status() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let view = engine.set_filter(Filter::all().with_status("levée")).unwrap();

    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, "R2");
}

#[test]
fn test_set_filter_by_date() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let since = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let view = engine.set_filter(Filter::all().with_min_created(since)).unwrap();

    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, "R2");
}

#[test]
fn test_status_choices() {
    let (_temp, mut engine) = setup_unlocked_engine();

    assert_eq!(engine.status_choices().unwrap(), vec!["Tous", "en cours", "levée"]);
}

#[test]
fn test_edit_out_of_range_row() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let result = engine.edit(5, Field::Status, "levée");

    assert!(matches!(result, Err(ReserveError::Validation(_))));
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_edit_and_save_updates_only_edited_record() {
    let (_temp, mut engine) = setup_unlocked_engine();

    engine.edit(0, Field::Status, "levée").unwrap();
    let updated = engine.save().unwrap();

    assert_eq!(updated, 2);
    assert_eq!(
        stored(&engine),
        vec![
            Record::new("R1", "leak", "2024-01-01", "", "levée"),
            Record::new("R2", "crack", "2024-02-01", "2024-03-01", "levée"),
        ]
    );
}

#[test]
fn test_save_filtered_view_leaves_hidden_rows() {
    let (_temp, mut engine) = setup_unlocked_engine();

    engine.set_filter(Filter::all().with_status("levée")).unwrap();
    engine.edit(0, Field::Description, "big crack").unwrap();
    assert_eq!(engine.save().unwrap(), 1);

    let records = stored(&engine);
    assert_eq!(records[0], Record::new("R1", "leak", "2024-01-01", "", "en cours"));
    assert_eq!(records[1].description, "big crack");
}

#[test]
fn test_pushed_row_with_new_id_is_not_inserted() {
    let (_temp, mut engine) = setup_unlocked_engine();

    engine
        .push_row(Record::new("R9", "ghost", "2024-01-01", "", ""))
        .unwrap();
    assert_eq!(engine.view().unwrap().len(), 3);

    assert_eq!(engine.save().unwrap(), 2);
    assert_eq!(stored(&engine).len(), 2);
    assert_eq!(engine.view().unwrap().len(), 2);
}

#[test]
fn test_removed_row_is_not_deleted() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let removed = engine.remove_row(0).unwrap();
    assert_eq!(removed.id, "R1");
    assert!(matches!(engine.remove_row(5), Err(ReserveError::Validation(_))));

    engine.save().unwrap();
    assert_eq!(stored(&engine).len(), 2);
}

#[test]
fn test_save_without_changes_keeps_register() {
    let (_temp, mut engine) = setup_unlocked_engine();
    let before = stored(&engine);

    engine.save().unwrap();

    assert_eq!(stored(&engine), before);
}

// =============================================================================
// Add Tests
// =============================================================================

#[test]
fn test_add_appends_and_refreshes_view() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let id = engine
        .add(Record::new("R3", "gap", "2024-04-01", "", "en cours"))
        .unwrap();

    assert_eq!(id, "R3");
    assert_eq!(engine.view().unwrap().len(), 3);
    assert_eq!(stored(&engine).len(), 3);
}

#[test]
fn test_add_empty_id_rejected() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let result = engine.add(Record::new("", "gap", "2024-04-01", "", ""));

    assert!(matches!(result, Err(ReserveError::Validation(_))));
    assert_eq!(stored(&engine).len(), 2);
}

#[test]
fn test_add_discards_unsaved_edits() {
    let (_temp, mut engine) = setup_unlocked_engine();

    engine.edit(0, Field::Status, "N/A").unwrap();
    engine
        .add(Record::new("R3", "gap", "2024-04-01", "", ""))
        .unwrap();

    assert_eq!(engine.view().unwrap()[0].status, "en cours");
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_session_flow() {
    let (_temp, config) = setup_temp_register();
    let mut engine = Engine::open(config);

    assert!(matches!(engine.execute(Command::Reload), Err(ReserveError::Auth)));

    let outcome = engine
        .execute(Command::Unlock {
            password: PASSWORD.to_string(),
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Unlocked(true));

    let outcome = engine
        .execute(Command::Filter(Filter::all().with_status("en cours")))
        .unwrap();
    assert_eq!(outcome, Outcome::View(1));

    engine
        .execute(Command::Edit {
            row: 0,
            field: Field::ClosedAt,
            value: "2024-05-01".to_string(),
        })
        .unwrap();
    assert_eq!(engine.execute(Command::Save).unwrap(), Outcome::Saved(1));

    let outcome = engine
        .execute(Command::Add(Record::new("R3", "", "2024-06-01", "", "")))
        .unwrap();
    assert_eq!(outcome, Outcome::Added("R3".to_string()));

    assert_eq!(stored(&engine)[0].closed_at, "2024-05-01");
}

#[test]
fn test_execute_view_commands() {
    let (_temp, mut engine) = setup_unlocked_engine();

    let outcome = engine
        .execute(Command::PushRow(Record::new("R9", "", "", "", "")))
        .unwrap();
    assert_eq!(outcome, Outcome::View(3));

    let outcome = engine.execute(Command::RemoveRow { row: 2 }).unwrap();
    assert_eq!(outcome, Outcome::Removed(Record::new("R9", "", "", "", "")));

    assert_eq!(engine.execute(Command::Reload).unwrap(), Outcome::View(2));
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_current_view() {
    let (_temp, mut engine) = setup_unlocked_engine();

    engine.set_filter(Filter::all().with_status("levée")).unwrap();
    let Outcome::Exported(bytes) = engine.execute(Command::Export).unwrap() else {
        panic!("expected a PDF");
    };

    let pdf = String::from_utf8(bytes).unwrap();
    assert!(pdf.starts_with("%PDF-1.4"));
    assert!(pdf.contains("(R2) Tj"));
    assert!(!pdf.contains("(R1) Tj"));
}

#[test]
fn test_close_ends_session() {
    let (_temp, engine) = setup_unlocked_engine();
    assert!(engine.is_authenticated());
    engine.close();
}
