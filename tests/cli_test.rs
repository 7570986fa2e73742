use anyhow::Result;
use std::process::Command;

const LEGACY: &str = env!("CARGO_BIN_EXE_diluvian-legacy");
const DILUVIAN: &str = env!("CARGO_BIN_EXE_diluvian");

#[test]
fn test_legacy_wrong_argument_count_prints_usage() -> Result<()> {
    for args in [&[][..], &["10"][..], &["10", "2", "3"][..]] {
        let output = Command::new(LEGACY).args(args).output()?;

        assert_eq!(output.status.code(), Some(2), "args {:?}", args);
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8(output.stderr)?;
        assert!(stderr.starts_with("Usage: diluvian-legacy <cache_size> <reps>"));
    }
    Ok(())
}

#[test]
fn test_legacy_run_multiplies_reps() -> Result<()> {
    let output = Command::new(LEGACY).args(["4", "2"]).output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Took "));
    assert!(lines[0].ends_with("ms to allocate 8 trees in a cache of 4"));
    Ok(())
}

#[test]
fn test_legacy_rejects_zero_cache_size() -> Result<()> {
    let output = Command::new(LEGACY).args(["0", "5"]).output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("cache size"));
    Ok(())
}

#[test]
fn test_named_options_print_worker_and_total_lines() -> Result<()> {
    let output = Command::new(DILUVIAN)
        .args(["-s", "3", "-r", "6", "-h", "2", "-t", "2", "-a", "--seed", "1"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("worker 0: Took "));
    assert!(lines[0].ends_with("ms to allocate 6 trees in a cache of 3"));
    assert!(lines[1].starts_with("worker 1: Took "));
    assert!(lines[2].starts_with("Total: took "));
    assert!(lines[2].ends_with("for 2 workers"));
    Ok(())
}

#[test]
fn test_named_options_reject_negative_height() -> Result<()> {
    let output = Command::new(DILUVIAN).args(["--height", "-1"]).output()?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr)?.contains("tree height"));
    Ok(())
}
