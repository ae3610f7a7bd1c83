//! The two command pipelines: TSV import to a console and offer generation to a file.

use std::io::{IsTerminal, Write};
use std::path::Path;

use rand::Rng;
use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::error::{OfferError, Result};
use crate::generator::OfferGenerator;
use crate::sources::OfferSource;
use crate::tsv::{TsvLine, TsvReader, TsvWriter};

/// What an import printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub header: Option<String>,
    pub rows: usize,
}

pub const IMPORT_BANNER: &str = "Imported data:";

/// How imported lines are rendered on the console.
///
/// Plain output is the file content line by line; colored output adds a
/// banner and highlights the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleStyle {
    color: bool,
}

impl ConsoleStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Color only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn banner(&self) -> Option<String> {
        self.color.then(|| self.colorize(IMPORT_BANNER, "95"))
    }

    fn header(&self, line: &str) -> String {
        self.colorize(line, "1;92")
    }
}

/// Stream the TSV file at `path` into `out`, header first.
///
/// Lines are written as soon as they are read, so a stream error leaves the
/// lines printed before it in place.
pub async fn import_tsv<W: Write>(
    path: impl AsRef<Path>,
    out: &mut W,
    style: ConsoleStyle,
) -> Result<ImportSummary> {
    let path = path.as_ref();
    let mut reader = TsvReader::open(path).await?;
    let summary = print_lines(&mut reader, out, style).await?;
    info!("Imported {} rows from {}", summary.rows, path.display());
    Ok(summary)
}

/// Copy every line of `reader` to `out`, one per output line.
pub async fn print_lines<R, W>(
    reader: &mut TsvReader<R>,
    out: &mut W,
    style: ConsoleStyle,
) -> Result<ImportSummary>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut summary = ImportSummary::default();

    if let Some(banner) = style.banner() {
        writeln!(out, "{}", banner)?;
    }

    while let Some(line) = reader.next_line().await? {
        match line {
            TsvLine::Header(header) => {
                writeln!(out, "{}", style.header(&header))?;
                summary.header = Some(header);
            }
            TsvLine::Row(row) => {
                writeln!(out, "{}", row)?;
                summary.rows += 1;
            }
        }
        out.flush()?;
    }

    Ok(summary)
}

/// Parse the `<count>` argument of the generate command.
pub fn parse_count(raw: &str) -> Result<usize> {
    raw.trim().parse().map_err(|_| {
        OfferError::Argument(format!("count must be a non-negative integer, got '{raw}'"))
    })
}

/// Fetch base offers from `source`, synthesize `count` offers and write them to `path`.
///
/// The destination is only created once the fetch succeeded. Returns the
/// number of data rows written.
pub async fn generate_tsv<S, R>(
    source: &S,
    generator: &mut OfferGenerator<R>,
    count: usize,
    path: impl AsRef<Path>,
) -> Result<usize>
where
    S: OfferSource + ?Sized,
    R: Rng,
{
    let path = path.as_ref();
    let bases = source.fetch().await?;
    debug!("Using {} base offers from {}", bases.len(), source.source_name());

    if count > 0 && bases.is_empty() {
        return Err(OfferError::Fetch(format!(
            "{} returned no base offers",
            source.source_name()
        )));
    }

    let mut writer = TsvWriter::create(path).await?;
    for _ in 0..count {
        let base = generator
            .pick_base(&bases)
            .ok_or_else(|| OfferError::Fetch("no base offers to pick from".to_string()))?;
        let offer = generator.generate(base);
        writer.write_offer(&offer).await?;
    }
    let rows = writer.finish().await?;

    info!("Wrote {} offers to {}", rows, path.display());
    Ok(rows)
}
