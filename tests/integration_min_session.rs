// Minimal integration test that drives the compiled binary through a PTY.
// Exercises the real event loop, mouse capture setup and terminal restore.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn session_starts_and_exits_on_escape() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("welder");
    let cmd = format!(
        "{} --config {} --log-file {}",
        bin.display(),
        dir.path().join("welder.json").display(),
        dir.path().join("welder.log").display()
    );

    let mut p = spawn(cmd)?;

    // let the app enter the alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // restart once, then leave
    p.send("r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}
