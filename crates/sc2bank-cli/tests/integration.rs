//! Integration tests for CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

const SIGNATURE: &str = "3ECC1CCD9762908DE09D322235D5ED4D13CD1C53";
const AUTHOR_ID: &str = "1-S2-1-4337146";
const USER_ID: &str = "1-S2-1-4253458";
const BANK_NAME: &str = "llIlIIlIlIllIllI";

fn make_contents(value: &str, signature: Option<&str>) -> String {
    let signature = signature
        .map(|s| format!("    <Signature value=\"{}\"/>\n", s))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Bank version="1">
    <Section name="lllllIIlIllIIllI">
        <Key name="lllllllIlIllIIII">
            <Value int="{}"/>
        </Key>
    </Section>
    <Section name="IIlIlIIlllIIII">
        <Key name="IllIIIIIlIIIII">
            <Value int="780000"/>
        </Key>
    </Section>
{}</Bank>
"#,
        value, signature
    )
}

/// Lays the bank out under `<tmp>/<user>/Banks/<author>/<name>.SC2Bank`.
fn create_bank_tree(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join(USER_ID).join("Banks").join(AUTHOR_ID);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.SC2Bank", BANK_NAME));
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

fn create_loose_bank(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bank.SC2Bank");
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn run_cli_with_stdin(args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sc2bank"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");

    {
        let mut handle = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            // The CLI may exit before reading stdin.
            let _ = handle.write_all(input.as_bytes());
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn run_cli(args: &[&str]) -> (i32, String, String) {
    run_cli_with_stdin(args, None)
}

#[test]
fn test_verify_derives_identity_from_path() {
    let (_temp_dir, path) = create_bank_tree(&make_contents("5", Some(SIGNATURE)));

    let (code, stdout, _) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 0);
    assert!(stdout.contains(&format!("Calculated signature: {}", SIGNATURE)));
    assert!(stdout.contains(&format!("Recorded signature:   {}", SIGNATURE)));
    assert!(!stdout.contains("NOT equal"));
}

#[test]
fn test_verify_with_explicit_identity() {
    let (_temp_dir, path) = create_loose_bank(&make_contents("5", Some(SIGNATURE)));

    let (code, stdout, _) = run_cli(&[
        "verify",
        "-a",
        AUTHOR_ID,
        "--userid",
        USER_ID,
        "--bankname",
        BANK_NAME,
        &path_arg(&path),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains(SIGNATURE));
}

#[test]
fn test_verify_detects_tampering() {
    let (_temp_dir, path) = create_bank_tree(&make_contents("6", Some(SIGNATURE)));

    let (code, stdout, _) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Signatures are NOT equal!"));
}

#[test]
fn test_verify_unsigned_bank() {
    let (_temp_dir, path) = create_bank_tree(&make_contents("5", None));

    let (code, stdout, _) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Recorded signature:   (No signature in XML document.)"));
}

#[test]
fn test_verify_json_output() {
    let (_temp_dir, path) = create_bank_tree(&make_contents("5", Some(SIGNATURE)));

    let (code, stdout, _) = run_cli(&["verify", "--json", &path_arg(&path)]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(parsed["computed"], SIGNATURE);
    assert_eq!(parsed["recorded"], SIGNATURE);
    assert_eq!(parsed["match"], true);
}

#[test]
fn test_verify_stdin_requires_identity() {
    let (code, _, stderr) = run_cli_with_stdin(
        &["verify", "-"],
        Some(&make_contents("5", Some(SIGNATURE))),
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("Must specify --userid, --authorid, and --bankname"));
}

#[test]
fn test_verify_stdin_with_identity() {
    let (code, stdout, _) = run_cli_with_stdin(
        &["verify", "-a", AUTHOR_ID, "-u", USER_ID, "-b", BANK_NAME, "-"],
        Some(&make_contents("5", Some(SIGNATURE))),
    );
    assert_eq!(code, 0);
    assert!(stdout.contains(SIGNATURE));
}

#[test]
fn test_verify_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.SC2Bank");

    let (code, _, stderr) = run_cli(&["verify", &path_arg(&missing)]);
    assert_eq!(code, 2);
    assert!(stderr.contains("is not a file."));
}

#[test]
fn test_verify_loose_bank_without_identity_fails() {
    let (_temp_dir, path) = create_loose_bank(&make_contents("5", Some(SIGNATURE)));

    let (code, _, stderr) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot resolve identity"));
}

#[test]
fn test_unresolved_path_identity_is_logged_as_warning() {
    let (_temp_dir, path) = create_loose_bank(&make_contents("5", Some(SIGNATURE)));

    let (_, _, stderr) = run_cli(&["verify", &path_arg(&path)]);
    assert!(stderr.contains("WARN"));
    assert!(stderr.contains("path does not reveal the full identity"));

    let (_, _, stderr) = run_cli(&["--log-level", "error", "verify", &path_arg(&path)]);
    assert!(!stderr.contains("path does not reveal the full identity"));
    assert!(stderr.contains("cannot resolve identity"));
}

#[test]
fn test_verify_rejects_bad_document() {
    let (_temp_dir, path) = create_bank_tree("<NotABank/>");

    let (code, _, stderr) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid root tag: NotABank"));
}

#[test]
fn test_inspect_command() {
    let path = ["Accounts", "12345678", USER_ID, "Banks", AUTHOR_ID, "bank.SC2Bank"]
        .iter()
        .collect::<PathBuf>();

    let (code, stdout, _) = run_cli(&["inspect", "--json", &path_arg(&path)]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["author_id"], AUTHOR_ID);
    assert_eq!(parsed["user_id"], USER_ID);
    assert_eq!(parsed["name"], "bank");
}

#[test]
fn test_inspect_unknown_fields() {
    let (code, stdout, _) = run_cli(&["inspect", "notes.txt"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("AUTHOR_ID  (unknown)"));
    assert!(stdout.contains("NAME       (unknown)"));
}

#[test]
fn test_canonicalize_command() {
    let (_temp_dir, path) = create_bank_tree(&make_contents("5", Some(SIGNATURE)));

    let (code, stdout, _) = run_cli(&["canonicalize", &path_arg(&path)]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "1-S2-1-43371461-S2-1-4253458llIlIIlIlIllIllI\
         IIlIlIIlllIIIIIllIIIIIlIIIIIValueint780000\
         lllllIIlIllIIllIlllllllIlIllIIIIValueint5"
    );
}

#[test]
fn test_sign_repairs_tampered_bank() {
    let stale = "0000000000000000000000000000000000000000";
    let (_temp_dir, path) = create_bank_tree(&make_contents("5", Some(stale)));

    let (code, _, _) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 1);

    let (code, stdout, _) = run_cli(&["sign", &path_arg(&path)]);
    assert_eq!(code, 0);
    assert!(stdout.contains(&format!("New signature: {}", SIGNATURE)));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        make_contents("5", Some(SIGNATURE))
    );

    let (code, _, _) = run_cli(&["verify", &path_arg(&path)]);
    assert_eq!(code, 0);
}

#[test]
fn test_sign_to_output_leaves_input_untouched() {
    let stale = "0000000000000000000000000000000000000000";
    let original = make_contents("5", Some(stale));
    let (temp_dir, path) = create_bank_tree(&original);
    let output = temp_dir.path().join("signed.SC2Bank");

    let (code, _, _) = run_cli(&["sign", &path_arg(&path), "--output", &path_arg(&output)]);
    assert_eq!(code, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        make_contents("5", Some(SIGNATURE))
    );
}

#[test]
fn test_sign_refuses_ambiguous_signature() {
    let stale = "0000000000000000000000000000000000000000";
    let contents = make_contents("5", Some(stale))
        .replace("<Bank version=\"1\">", &format!("<Bank version=\"1\">\n<!-- {} -->", stale));
    let (_temp_dir, path) = create_bank_tree(&contents);

    let (code, _, stderr) = run_cli(&["sign", &path_arg(&path)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("occurs 2 times"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn test_sign_requires_recorded_signature() {
    let (_temp_dir, path) = create_bank_tree(&make_contents("5", None));

    let (code, _, stderr) = run_cli(&["sign", &path_arg(&path)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no recorded signature"));
}
