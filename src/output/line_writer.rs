use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::config::{Config, Mode, ENDPOINT_PROVENANCE, PARAMS_OUTPUT, PARAMS_PROVENANCE};

/// The two append-only files a run writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// One candidate per line.
    pub primary: PathBuf,
    /// `{source_url}/{candidate}` per line.
    pub provenance: PathBuf,
}

impl OutputPaths {
    /// Parameter mode always writes `params.txt`; `output` only applies to endpoint mode.
    pub fn in_dir(dir: &Path, mode: Mode, output: &str) -> Self {
        let (primary, provenance) = match mode {
            Mode::Endpoints => (output, ENDPOINT_PROVENANCE),
            Mode::Parameters => (PARAMS_OUTPUT, PARAMS_PROVENANCE),
        };
        Self {
            primary: dir.join(primary),
            provenance: dir.join(provenance),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::in_dir(&cfg.out_dir, cfg.mode, &cfg.output)
    }
}

/// Append handles for one URL's discoveries. Opened and closed per invocation.
pub struct LineSink {
    primary: File,
    provenance: File,
}

async fn open_append(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))
}

impl LineSink {
    pub async fn open(paths: &OutputPaths) -> anyhow::Result<Self> {
        Ok(Self {
            primary: open_append(&paths.primary).await?,
            provenance: open_append(&paths.provenance).await?,
        })
    }

    /// Write the candidate line, then its provenance line. Each line is one write,
    /// flushed before returning so a failure belongs to this candidate.
    pub async fn record(&mut self, source_url: &str, candidate: &str) -> anyhow::Result<()> {
        self.primary.write_all(format!("{}\n", candidate).as_bytes()).await?;
        self.primary.flush().await?;
        self.provenance
            .write_all(format!("{}/{}\n", source_url, candidate).as_bytes())
            .await?;
        self.provenance.flush().await?;
        Ok(())
    }

    pub async fn finish(mut self) -> anyhow::Result<()> {
        self.primary.flush().await?;
        self.provenance.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_per_mode() {
        let ep = OutputPaths::in_dir(Path::new("."), Mode::Endpoints, "out.txt");
        assert_eq!(ep.primary, Path::new("./out.txt"));
        assert_eq!(ep.provenance, Path::new("./success.txt"));

        let pm = OutputPaths::in_dir(Path::new("."), Mode::Parameters, "out.txt");
        assert_eq!(pm.primary, Path::new("./params.txt"));
        assert_eq!(pm.provenance, Path::new("./success_params.txt"));
    }

    #[tokio::test]
    async fn test_record_appends_pairs() {
        let dir = std::env::temp_dir().join(format!("jpm-sink-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = OutputPaths::in_dir(&dir, Mode::Endpoints, "ep.txt");
        let _ = std::fs::remove_file(&paths.primary);
        let _ = std::fs::remove_file(&paths.provenance);

        for _ in 0..2 {
            let mut sink = LineSink::open(&paths).await.unwrap();
            sink.record("https://a.example/app.js", "/login").await.unwrap();
            sink.finish().await.unwrap();
        }

        let primary = std::fs::read_to_string(&paths.primary).unwrap();
        let provenance = std::fs::read_to_string(&paths.provenance).unwrap();
        assert_eq!(primary, "/login\n/login\n");
        assert_eq!(provenance, "https://a.example/app.js//login\nhttps://a.example/app.js//login\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
