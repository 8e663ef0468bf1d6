use std::process::Command;

use anyhow::{Context, Result};

fn run_bin(bin: &str, args: &[&str]) -> Result<String> {
    let out = Command::new(bin)
        .args(args)
        .output()
        .with_context(|| format!("run {} {:?}", bin, args))?;

    if !out.status.success() {
        anyhow::bail!(
            "{} {:?} failed (status {:?})\nstdout:\n{}\nstderr:\n{}",
            bin,
            args,
            out.status,
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

#[test]
fn cli_help_surface_is_stable() -> Result<()> {
    let help = run_bin(env!("CARGO_BIN_EXE_resonance"), &["--help"])?;
    assert!(help.contains("Usage: resonance"));
    assert!(help.contains("search"));
    assert!(help.contains("match"));
    assert!(help.contains("--server"));

    let match_help = run_bin(env!("CARGO_BIN_EXE_resonance"), &["match", "--help"])?;
    assert!(match_help.contains("--artist"));

    Ok(())
}

#[test]
fn server_help_lists_upstream_options() -> Result<()> {
    let help = run_bin(env!("CARGO_BIN_EXE_resonance-server"), &["--help"])?;
    assert!(help.contains("--client-id"));
    assert!(help.contains("--client-secret"));
    assert!(help.contains("--accounts-url"));
    assert!(help.contains("--search-url"));
    assert!(help.contains("--addr-file"));
    assert!(!help.contains("test-secret"));

    Ok(())
}
