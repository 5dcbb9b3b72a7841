use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn chordify(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("chordify").expect("binary");
    cmd.current_dir(dir)
        .env_remove("CHORDIFY_SECRET_KEY")
        .env_remove("CHORDIFY_BPM")
        .env_remove("CHORDIFY_FORMAT");
    cmd
}

#[test]
fn keys_lists_thirty_keys() {
    let dir = tempdir().expect("tempdir");
    let output = chordify(dir.path()).arg("keys").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.lines().count(), 30);
    assert!(stdout.contains("A minor"));
    assert!(stdout.contains("A B C D E F G#"));
}

#[test]
fn chords_from_inline_notes() {
    let dir = tempdir().expect("tempdir");
    chordify(dir.path())
        .args(["chords", "--notes", "B F A G# D C B E", "--key", "A minor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("key: A minor"))
        .stdout(predicate::str::contains("Dm"))
        .stdout(predicate::str::contains("(cadence)"));
}

#[test]
fn estimate_prints_the_key() {
    let dir = tempdir().expect("tempdir");
    chordify(dir.path())
        .args(["estimate", "--notes", "C D E F G A B C"])
        .assert()
        .success()
        .stdout("C major\n");
}

#[test]
fn encode_then_decode_recovers_the_melody() {
    let dir = tempdir().expect("tempdir");
    chordify(dir.path())
        .args(["encode", "--notes", "B F A G# D C B E", "--secret", "A minor", "-o", "hidden.yaml"])
        .assert()
        .success();
    assert!(dir.path().join("hidden.yaml").exists());

    chordify(dir.path())
        .args(["decode", "hidden.yaml", "--secret", "A minor", "-q"])
        .assert()
        .success()
        .stdout("B:1 F:1 A:1 G#:1 D:1 C:1 B:1 E:1\n");
}

#[test]
fn secret_key_comes_from_the_environment() {
    let dir = tempdir().expect("tempdir");
    chordify(dir.path())
        .env("CHORDIFY_SECRET_KEY", "D major")
        .args(["encode", "--notes", "D F# A", "-o", "hidden.json"])
        .assert()
        .success();

    chordify(dir.path())
        .env("CHORDIFY_SECRET_KEY", "D major")
        .args(["decode", "hidden.json", "-q"])
        .assert()
        .success()
        .stdout("D:1 F#:1 A:1\n");
}

#[test]
fn unknown_note_is_reported() {
    let dir = tempdir().expect("tempdir");
    chordify(dir.path())
        .args(["chords", "--notes", "C H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected character 'H'"));
}

#[test]
fn invalid_key_is_rejected_by_the_parser() {
    let dir = tempdir().expect("tempdir");
    chordify(dir.path())
        .args(["chords", "--notes", "C", "--key", "X major"])
        .assert()
        .failure();
}
