use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quill"))
}

fn quill(data_dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(bin());
    cmd.arg("--data-dir").arg(data_dir).args(args);
    // Keep config/editor resolution away from the real home directory.
    cmd.env("HOME", data_dir)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("QUILL_PASSWORD")
        .env_remove("EDITOR");
    cmd
}

fn run_ok(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("command should run");
    assert!(
        output.status.success(),
        "command failed\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn list_notes_json(data_dir: &Path) -> serde_json::Value {
    let output = run_ok(quill(data_dir, &["list", "--json"]).arg("--quiet"));
    serde_json::from_str(&stdout(&output)).expect("list --json should emit JSON")
}

fn first_note_id(data_dir: &Path) -> String {
    list_notes_json(data_dir)[0]["id"]
        .as_str()
        .expect("note id")
        .to_string()
}

fn note_id_by_title(data_dir: &Path, title: &str) -> String {
    let notes = list_notes_json(data_dir);
    notes
        .as_array()
        .expect("array")
        .iter()
        .find(|note| note["title"] == title)
        .unwrap_or_else(|| panic!("no note titled {:?}", title))["id"]
        .as_str()
        .expect("note id")
        .to_string()
}

#[test]
fn test_new_list_show_flow() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(
        data,
        &["new", "Groceries", "--body", "milk, eggs, bread"],
    ));

    let notes = list_notes_json(data);
    assert_eq!(notes.as_array().map(Vec::len), Some(1));
    assert_eq!(notes[0]["title"], "Groceries");
    assert_eq!(notes[0]["content"], "milk, eggs, bread");
    assert_eq!(notes[0]["isEncrypted"], false);

    let id = first_note_id(data);
    let output = run_ok(&mut quill(data, &["show", &id]));
    assert!(stdout(&output).contains("milk, eggs, bread"));

    // Prefix resolution
    let output = run_ok(&mut quill(data, &["show", &id[..8]]));
    assert!(stdout(&output).contains("milk, eggs, bread"));
}

#[test]
fn test_pin_orders_first() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "first", "--body", "a"]));
    run_ok(&mut quill(data, &["new", "second", "--body", "b"]));

    // "second" is newer and lists first; pin "first" to pull it to the top.
    let first_id = note_id_by_title(data, "first");
    run_ok(&mut quill(data, &["pin", &first_id]));

    let notes = list_notes_json(data);
    assert_eq!(notes[0]["title"], "first");
    assert_eq!(notes[0]["isPinned"], true);
}

#[test]
fn test_lock_unlock_flow() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();
    let password = "Tr0ub4dor&3";

    run_ok(&mut quill(
        data,
        &["new", "Diary", "--body", "SECRET_BODY_MARKER"],
    ));
    let id = first_note_id(data);

    run_ok(quill(data, &["lock", &id]).env("QUILL_PASSWORD", password));

    // Plaintext is gone from every stored file.
    for entry in std::fs::read_dir(data).expect("read data dir") {
        let path = entry.expect("entry").path();
        if path.is_file() {
            let contents = std::fs::read(&path).expect("read file");
            assert!(
                !String::from_utf8_lossy(&contents).contains("SECRET_BODY_MARKER"),
                "plaintext leaked into {}",
                path.display()
            );
        }
    }

    let notes = list_notes_json(data);
    assert_eq!(notes[0]["isEncrypted"], true);
    assert_eq!(notes[0]["content"], "");
    // Titles stay readable.
    assert_eq!(notes[0]["title"], "Diary");

    // Peek decrypts without unlocking.
    let output = run_ok(quill(data, &["peek", &id]).env("QUILL_PASSWORD", password));
    assert!(stdout(&output).contains("SECRET_BODY_MARKER"));
    assert_eq!(list_notes_json(data)[0]["isEncrypted"], true);

    // Unlock restores the body.
    run_ok(quill(data, &["unlock", &id]).env("QUILL_PASSWORD", password));
    let notes = list_notes_json(data);
    assert_eq!(notes[0]["isEncrypted"], false);
    assert_eq!(notes[0]["content"], "SECRET_BODY_MARKER");
}

#[test]
fn test_unlock_with_wrong_password_exits_auth_failed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "Diary", "--body", "secret"]));
    let id = first_note_id(data);
    run_ok(quill(data, &["lock", &id]).env("QUILL_PASSWORD", "Correct!Pass1"));

    let output = quill(data, &["unlock", &id])
        .env("QUILL_PASSWORD", "Wrong!Pass1")
        .output()
        .expect("command should run");
    assert_eq!(output.status.code(), Some(5));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Invalid password or corrupted data")
    );

    // Still locked.
    assert_eq!(list_notes_json(data)[0]["isEncrypted"], true);
}

#[test]
fn test_weak_password_rejected_unless_forced() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "Diary", "--body", "secret"]));
    let id = first_note_id(data);

    let output = quill(data, &["lock", &id])
        .env("QUILL_PASSWORD", "abc")
        .output()
        .expect("command should run");
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("strength policy"));

    run_ok(quill(data, &["lock", &id, "--force"]).env("QUILL_PASSWORD", "abc"));
    assert_eq!(list_notes_json(data)[0]["isEncrypted"], true);
}

#[test]
fn test_delete_removes_note() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "Doomed", "--body", "bye"]));
    let id = first_note_id(data);
    run_ok(&mut quill(data, &["delete", &id, "--yes"]));

    assert_eq!(list_notes_json(data).as_array().map(Vec::len), Some(0));

    let output = quill(data, &["show", &id]).output().expect("run");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_password_generate_and_check() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    let output = run_ok(quill(data, &["password", "generate", "--length", "20"]).arg("--quiet"));
    let password = stdout(&output).trim_end().to_string();
    assert_eq!(password.chars().count(), 20);

    let output = quill(data, &["password", "check", "Tr0ub4dor&3"])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("very strong"));

    let output = quill(data, &["password", "check", "abc"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_export_masks_ciphertext_and_import_restores() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "Open", "--body", "visible body"]));
    run_ok(&mut quill(data, &["new", "Hidden", "--body", "hidden body"]));
    let hidden_id = note_id_by_title(data, "Hidden");
    run_ok(quill(data, &["lock", &hidden_id]).env("QUILL_PASSWORD", "Str0ng!Pass1"));

    let export_path = data.join("export-out.json");
    run_ok(&mut quill(
        data,
        &["export", "--output", export_path.to_str().unwrap()],
    ));

    let export: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).expect("read export"))
            .expect("valid JSON");
    assert_eq!(export["encryptedNotes"][0]["envelope"], "[ENCRYPTED]");
    assert!(!export.to_string().contains("hidden body"));

    // Import into a fresh store: plaintext notes survive, the locked note
    // comes back unlocked and empty (its ciphertext never left the vault).
    let dir2 = tempfile::tempdir().expect("temp dir");
    let data2 = dir2.path();
    run_ok(&mut quill(
        data2,
        &["import", export_path.to_str().unwrap()],
    ));

    let notes = list_notes_json(data2);
    assert_eq!(notes.as_array().map(Vec::len), Some(2));
    let open_id = note_id_by_title(data2, "Open");
    let output = run_ok(&mut quill(data2, &["show", &open_id]));
    assert!(stdout(&output).contains("visible body"));
}

#[test]
fn test_stats() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "One", "--body", "a"]));
    run_ok(&mut quill(data, &["new", "Two", "--body", "b"]));
    let id = first_note_id(data);
    run_ok(quill(data, &["lock", &id]).env("QUILL_PASSWORD", "Str0ng!Pass1"));

    let output = run_ok(&mut quill(data, &["stats"]));
    let text = stdout(&output);
    assert!(text.contains("Notes: 2"));
    assert!(text.contains("Locked notes: 1"));
}

#[test]
fn test_list_plain_format() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path();

    run_ok(&mut quill(data, &["new", "Plain", "--body", "text"]));
    let output = run_ok(&mut quill(data, &["list", "--format", "plain"]));
    assert!(stdout(&output).contains("Plain"));

    let output = quill(data, &["list", "--json", "--format", "plain"])
        .output()
        .expect("run");
    assert!(!output.status.success());
}
