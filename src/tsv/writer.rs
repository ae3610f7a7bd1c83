use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::Result;
use crate::models::{GeneratedOffer, OFFER_COLUMNS};

/// Streams offers to a TSV destination, header first.
pub struct TsvWriter<W: AsyncWrite + Unpin> {
    inner: BufWriter<W>,
    rows: usize,
}

impl TsvWriter<File> {
    /// Create (or truncate) the file at `path` and write the header line.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).await?;
        debug!("Writing offers to {}", path.display());
        Self::new(file).await
    }
}

impl<W: AsyncWrite + Unpin> TsvWriter<W> {
    pub async fn new(inner: W) -> Result<Self> {
        let mut writer = Self {
            inner: BufWriter::new(inner),
            rows: 0,
        };
        writer.write_line(&OFFER_COLUMNS.join("\t")).await?;
        Ok(writer)
    }

    pub async fn write_offer(&mut self, offer: &GeneratedOffer) -> Result<()> {
        let line = offer.to_tsv_line()?;
        self.write_line(&line).await?;
        self.rows += 1;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.write_all(b"\n").await?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush buffered data and shut the destination down.
    ///
    /// Returns the number of data rows once everything reached the destination.
    pub async fn finish(&mut self) -> Result<usize> {
        self.inner.flush().await?;
        self.inner.shutdown().await?;
        Ok(self.rows)
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::OfferGenerator;
    use crate::models::BaseOffer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn empty_run_writes_only_header() {
        let mut writer = TsvWriter::new(Vec::new()).await.unwrap();
        assert_eq!(writer.finish().await.unwrap(), 0);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, format!("{}\n", OFFER_COLUMNS.join("\t")));
    }

    #[tokio::test]
    async fn one_line_per_offer() {
        let mut generator = OfferGenerator::with_rng(StdRng::seed_from_u64(8));
        let base = BaseOffer {
            title: Some("Studio".to_string()),
            ..BaseOffer::default()
        };

        let mut writer = TsvWriter::new(Vec::new()).await.unwrap();
        let mut offers = Vec::new();
        for _ in 0..5 {
            let offer = generator.generate(&base);
            writer.write_offer(&offer).await.unwrap();
            offers.push(offer);
        }
        assert_eq!(writer.rows_written(), 5);
        assert_eq!(writer.finish().await.unwrap(), 5);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].split('\t').count(), OFFER_COLUMNS.len());
        for (line, offer) in lines[1..].iter().zip(&offers) {
            assert_eq!(&GeneratedOffer::from_tsv_line(line).unwrap(), offer);
        }
    }
}
