//! Command implementations for the simple-search CLI.

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::load_config;
use crate::extract::{HtmlTextExtractor, TextExtractor, TitleGenerator};
use crate::search::SearchService;

/// Execute a CLI command.
pub fn execute_command(args: SimpleSearchArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search(search_args, &args),
        Command::Shell(shell_args) => shell(shell_args, &args),
        Command::Extract(extract_args) => extract(extract_args, &args),
    }
}

fn open_service(config_path: &std::path::Path, limit: Option<usize>) -> Result<SearchService> {
    let mut config = load_config(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(limit) = limit {
        config.engine.max_hits = limit.max(1);
    }

    Ok(SearchService::with_folder_source(config)?)
}

/// Build the index, then run one query.
fn search(args: &SearchArgs, cli_args: &SimpleSearchArgs) -> Result<()> {
    let service = open_service(&args.config, args.limit)?;

    let summary = service
        .build_or_rebuild_index()
        .context("failed to build the index")?;
    if cli_args.verbosity() > 1 {
        output_result(&summary, cli_args)?;
    }

    let result = service.search(&args.query_text());
    output_result(&result, cli_args)?;

    Ok(())
}

/// Build the index in the background and answer one query per stdin line.
///
/// Queries arriving before the build finishes get the no-index result.
fn shell(args: &ShellArgs, cli_args: &SimpleSearchArgs) -> Result<()> {
    let service = Arc::new(open_service(&args.config, None)?);
    let build = service.spawn_build();
    info!("Index build started; reading queries from stdin");

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let result = service.search(&line);
        output_result(&result, cli_args)?;
    }

    match build.join() {
        Ok(Ok(summary)) => {
            if cli_args.verbosity() > 1 {
                output_result(&summary, cli_args)?;
            }
            Ok(())
        }
        Ok(Err(e)) => {
            warn!("Index build failed: {e}");
            Err(e.into())
        }
        Err(_) => Err(anyhow!("index build thread panicked")),
    }
}

/// Print what would be indexed for one file.
fn extract(args: &ExtractArgs, cli_args: &SimpleSearchArgs) -> Result<()> {
    let content = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let html = String::from_utf8_lossy(&content);

    let extractor =
        HtmlTextExtractor::with_title_generator(TitleGenerator::new(args.title_length));
    let document = extractor.extract(&html, &args.selector);

    let output = ExtractionOutput::new(args.file.display().to_string(), document);
    output_result(&output, cli_args)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_search_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let args = SimpleSearchArgs::try_parse_from([
            "simple-search",
            "-q",
            "search",
            missing.to_str().unwrap(),
            "fire",
        ])
        .unwrap();

        assert!(execute_command(args).is_err());
    }

    #[test]
    fn test_search_over_folder() {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir(&pages).unwrap();
        fs::write(pages.join("fire.html"), "<h1>Fire</h1><p>Leave the building</p>").unwrap();

        let config = dir.path().join("config.json");
        let json = serde_json::json!({
            "sources": [{ "title": "Pages", "kind": "folder", "uri": pages, "file_pattern": "*.html" }]
        });
        fs::write(&config, json.to_string()).unwrap();

        let args = SimpleSearchArgs::try_parse_from([
            "simple-search",
            "-q",
            "--format",
            "json",
            "search",
            config.to_str().unwrap(),
            "fire",
        ])
        .unwrap();

        assert!(execute_command(args).is_ok());
    }

    #[test]
    fn test_extract_missing_file_fails() {
        let args = SimpleSearchArgs::try_parse_from([
            "simple-search",
            "extract",
            "/definitely/not/here.html",
        ])
        .unwrap();

        assert!(execute_command(args).is_err());
    }
}
