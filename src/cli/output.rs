//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{OutputFormat, SimpleSearchArgs};
use crate::document::ExtractedDocument;
use crate::error::Result;
use crate::index::BuildSummary;
use crate::search::SearchResult;

/// Values that know how to print themselves for people.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Result structure for extraction.
#[derive(Debug, Serialize)]
pub struct ExtractionOutput {
    pub file: String,
    pub title: String,
    pub body_text: String,
}

impl ExtractionOutput {
    pub fn new(file: String, document: ExtractedDocument) -> Self {
        ExtractionOutput {
            file,
            title: document.title,
            body_text: document.body_text,
        }
    }
}

impl HumanOutput for SearchResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.message)?;

        for (i, hit) in self.hits.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "{}. {} (score: {:.3})", i + 1, hit.display_text, hit.score)?;
            writeln!(out, "   {}", hit.uri)?;
        }

        Ok(())
    }
}

impl HumanOutput for BuildSummary {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "Indexed {} documents from {} sources ({} skipped, {} segments)",
            self.indexed, self.sources, self.skipped, self.segments
        )
    }
}

impl HumanOutput for ExtractionOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "File:  {}", self.file)?;
        writeln!(out, "Title: {}", self.title)?;
        writeln!(out, "───────────────")?;
        write!(out, "{}", self.body_text)
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(result: &T, args: &SimpleSearchArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, result, args.output_format, args.pretty)
}

/// Write a result to `out` in the given format.
pub fn write_result<T>(out: &mut dyn Write, result: &T, format: OutputFormat, pretty: bool) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match format {
        OutputFormat::Human => result.write_human(out)?,
        OutputFormat::Json => {
            let json = if pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;
    Ok(())
}
