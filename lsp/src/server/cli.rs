use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use inform_core::{DiskSource, Finding, Services, Severity, Workspace};

const USAGE: &str = "Usage: inform-lsp --check [--errors-only] <file>\n  --check <file>   : Validate a file against its directory, JSON output\n  --errors-only    : Show only errors in simple format";

/// Handles `--check`; `Ok(None)` means the server should start normally.
pub(crate) fn try_cli_check(args: &[String]) -> anyhow::Result<Option<String>> {
    let Some(i) = args.iter().position(|a| a == "--check") else {
        return Ok(None);
    };
    let errors_only = args.iter().any(|a| a == "--errors-only");
    let path = args[i + 1..]
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow::anyhow!(USAGE))?;

    let path = absolute(Path::new(path))?;
    if !path.is_file() {
        bail!("cannot read file '{}'", path.display());
    }

    let services = Services::bundled().context("loading bundled reference data")?;
    let workspace = Workspace::new(Arc::new(DiskSource), Arc::new(services));
    let findings = workspace.validate(&path);

    if errors_only {
        return Ok(Some(errors_report(&findings)));
    }
    let output = serde_json::json!({
        "path": path,
        "diagnostics": findings,
    });
    Ok(Some(serde_json::to_string_pretty(&output)?))
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolving the working directory")?;
    Ok(cwd.join(path))
}

fn errors_report(findings: &[Finding]) -> String {
    let errors: Vec<String> = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .map(|f| {
            format!(
                "Line {}:{}: {}",
                f.range.start.line + 1,
                f.range.start.character + 1,
                f.message
            )
        })
        .collect();
    if errors.is_empty() {
        "No errors found".to_string()
    } else {
        errors.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_without_flag_the_server_starts() {
        assert!(try_cli_check(&args(&["inform-lsp"])).unwrap().is_none());
        assert!(try_cli_check(&args(&["inform-lsp", "--stdio"])).unwrap().is_none());
    }

    #[test]
    fn test_usage_and_missing_file_are_errors() {
        assert!(try_cli_check(&args(&["inform-lsp", "--check"])).is_err());
        assert!(try_cli_check(&args(&["inform-lsp", "--check", "/no/such/TEST.JBI"])).is_err());
    }

    #[test]
    fn test_errors_only_report() {
        let dir = tempfile::tempdir().unwrap();
        let job = dir.path().join("TEST.JBI");
        std::fs::write(&job, "/JOB\n//NAME TEST\n//INST\nTIMER T=700\nTIMER T=100\nEND").unwrap();
        let job = job.to_string_lossy().to_string();

        let report = try_cli_check(&args(&["inform-lsp", "--check", "--errors-only", &job]))
            .unwrap()
            .unwrap();
        assert_eq!(report, "Line 4:7: T= must be between 0 and 655.35 seconds.");

        let json = try_cli_check(&args(&["inform-lsp", "--check", &job])).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["diagnostics"][0]["severity"], "error");
    }
}
