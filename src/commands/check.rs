use crate::config::AppConfig;
use crate::convert::{ConversionStats, Warning};
use crate::files::convert_in_memory;
use crate::utils::collect_inputs;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    changed: bool,
    stats: ConversionStats,
    warnings: Vec<Warning>,
}

fn report_file(cfg: &AppConfig, path: &Path) -> Result<FileReport> {
    let (source, conversion) = convert_in_memory(path, &cfg.convert)?;
    Ok(FileReport {
        path: path.display().to_string(),
        changed: conversion.output != source,
        stats: conversion.stats,
        warnings: conversion.warnings,
    })
}

fn render_text(report: &FileReport) -> String {
    let mut out = String::new();
    let status = if report.changed { "needs conversion" } else { "ok" };
    out.push_str(&format!(
        "{}: {} (calls={}, imports={}, factories={})\n",
        report.path,
        status,
        report.stats.converted_calls,
        report.stats.imports_replaced,
        report.stats.factory_calls
    ));
    for w in &report.warnings {
        out.push_str(&format!("{}:{}: {}: {}\n", report.path, w.line, w.message, w.arguments));
    }
    out
}

/// Execute the check command
///
/// Converts in memory only and fails when any file still needs conversion.
pub fn check(cfg: &AppConfig, inputs: &[PathBuf], json: bool) -> Result<()> {
    let files = collect_inputs(inputs, &cfg.files.extensions)?;
    if files.is_empty() {
        bail!("no input files found");
    }

    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0usize;
    for path in &files {
        match report_file(cfg, path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                failed += 1;
                tracing::error!("{}: {:#}", path.display(), e);
            }
        }
    }

    if json {
        let rendered =
            serde_json::to_string_pretty(&reports).context("failed to serialize report")?;
        println!("{}", rendered);
    } else {
        for report in &reports {
            print!("{}", render_text(report));
        }
    }

    if failed > 0 {
        bail!("{} of {} files could not be checked", failed, files.len());
    }
    let pending = reports.iter().filter(|r| r.changed).count();
    if pending > 0 {
        bail!("{} of {} files need conversion", pending, files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> AppConfig {
        AppConfig::parse("").unwrap()
    }

    #[test]
    fn test_check_clean_file_passes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "log.info(\"x {}\", x);").unwrap();
        assert!(check(&config(), &[path], false).is_ok());
    }

    #[test]
    fn test_check_pending_file_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "log.info(\"x \" + x);").unwrap();

        let err = check(&config(), &[path.clone()], true).unwrap_err();
        assert!(err.to_string().contains("1 of 1 files need conversion"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "log.info(\"x \" + x);");
        assert!(!dir.path().join("A.java.orig").exists());
    }

    #[test]
    fn test_check_missing_file() {
        let err = check(&config(), &[PathBuf::from("nonexistent/A.java")], false).unwrap_err();
        assert!(err.to_string().contains("could not be checked"));
    }

    #[test]
    fn render_text_lists_warnings() {
        let report = FileReport {
            path: "A.java".into(),
            changed: false,
            stats: ConversionStats::default(),
            warnings: vec![Warning {
                line: 3,
                arguments: "(\"a\" + f(\"b\")".into(),
                message: "cannot convert".into(),
            }],
        };
        let text = render_text(&report);
        assert!(text.starts_with("A.java: ok (calls=0, imports=0, factories=0)\n"));
        assert!(text.contains("A.java:3: cannot convert: (\"a\" + f(\"b\")\n"));
    }

    #[test]
    fn report_serializes_to_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "logger.warn(\"a \" + b);").unwrap();
        let report = report_file(&config(), &path).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["changed"], true);
        assert_eq!(value["stats"]["converted_calls"], 1);
        assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
    }
}
