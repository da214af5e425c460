//! Fetch, extract, dedup and write: one URL at a time, or a list through the worker pool.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::concurrent::{AggregationState, WorkerPool};
use crate::config::{Config, Mode};
use crate::gather::{extract_parameters, scan_urls};
use crate::http_client::Fetch;
use crate::output::{LineSink, OutputPaths};

/// What happened to one URL. Nothing else crosses the per-URL boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    Extracted { url: String, found: usize, new: usize },
    BadStatus { url: String, status: u16 },
    Failed { url: String, error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub bad_status: usize,
    pub failed: usize,
    pub endpoints: usize,
    pub parameters: usize,
}

pub struct Pipeline<F: Fetch> {
    fetcher: Arc<F>,
    state: Arc<AggregationState>,
    config: Config,
    paths: OutputPaths,
}

impl<F: Fetch> Clone for Pipeline<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            state: self.state.clone(),
            config: self.config.clone(),
            paths: self.paths.clone(),
        }
    }
}

impl<F: Fetch + 'static> Pipeline<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        let state = Arc::new(AggregationState::new(config.dedup));
        let paths = OutputPaths::from_config(&config);
        Self {
            fetcher: Arc::new(fetcher),
            state,
            config,
            paths,
        }
    }

    pub fn state(&self) -> &AggregationState {
        &self.state
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Process one URL. Failures are reported to the console and returned, never propagated.
    pub async fn process(&self, url: &str) -> UrlOutcome {
        let outcome = match self.try_process(url).await {
            Ok(outcome) => outcome,
            Err(e) => UrlOutcome::Failed {
                url: url.to_string(),
                error: format!("{:#}", e),
            },
        };

        match &outcome {
            UrlOutcome::Extracted { found, new, .. } => {
                tracing::debug!(url=%url, found, new, "document processed");
            }
            UrlOutcome::BadStatus { status, .. } => {
                tracing::warn!(url=%url, status, "unexpected status");
                println!("[-] Bad JS File Detected - URL: {} (status {})", url, status);
            }
            UrlOutcome::Failed { error, .. } => {
                tracing::warn!(url=%url, error=%error, "request failed");
                println!("[-] Error accessing {}: {}", url, error);
            }
        }
        outcome
    }

    async fn try_process(&self, url: &str) -> anyhow::Result<UrlOutcome> {
        let resp = self.fetcher.fetch(url).await?;
        if !resp.is_ok() {
            return Ok(UrlOutcome::BadStatus { url: url.to_string(), status: resp.status });
        }

        // open before claiming: a claim is only made when there is somewhere to write it
        let mut sink = LineSink::open(&self.paths).await?;

        let (found, fresh, seen) = match self.config.mode {
            Mode::Parameters => {
                let params = extract_parameters(&resp.body);
                let found = params.len();
                let fresh: Vec<String> = params
                    .into_iter()
                    .filter(|p| self.state.parameters.claim(p))
                    .collect();
                (found, fresh, &self.state.parameters)
            }
            Mode::Endpoints => {
                let hits = scan_urls(&resp.body, &self.state.endpoints);
                let found = hits.found();
                // relative hits were claimed during the scan
                let mut fresh: BTreeSet<String> = hits
                    .absolute
                    .into_iter()
                    .filter(|u| self.state.endpoints.claim(u))
                    .collect();
                fresh.extend(hits.relative);
                (found, fresh.into_iter().collect(), &self.state.endpoints)
            }
        };

        for (i, candidate) in fresh.iter().enumerate() {
            if let Err(e) = sink.record(url, candidate).await {
                // unwritten candidates stay discoverable by later documents
                for unwritten in &fresh[i..] {
                    seen.release(unwritten);
                }
                return Err(e);
            }
            self.announce(url, candidate);
        }
        sink.finish().await?;

        Ok(UrlOutcome::Extracted { url: url.to_string(), found, new: fresh.len() })
    }

    fn announce(&self, url: &str, candidate: &str) {
        let kind = match self.config.mode {
            Mode::Endpoints => "URL",
            Mode::Parameters => "Parameter",
        };
        if self.config.verbose {
            println!("[+] URL: {} - Extracted {}: {}", url, kind, candidate);
        } else {
            println!("[+] Extracted {}: {}", kind, candidate);
        }
    }

    /// Process every URL through a pool of `config.workers` workers.
    pub async fn process_list(&self, urls: Vec<String>) -> RunSummary {
        let pool = WorkerPool::new(self.config.workers);
        tracing::info!(urls = urls.len(), workers = pool.workers(), "processing url list");

        let pipeline = self.clone();
        let outcomes = pool
            .execute(urls, move |url: String| {
                let pipeline = pipeline.clone();
                async move { pipeline.process(&url).await }
            })
            .await;

        let mut summary = self.summarize(outcomes.iter().flatten());
        // a panicked task still consumed its URL
        let stats = pool.stats();
        summary.processed = outcomes.len();
        summary.failed += stats.panicked;
        tracing::info!(?summary, completed = stats.completed, "run complete");
        summary
    }

    pub fn summarize<'a>(&self, outcomes: impl Iterator<Item = &'a UrlOutcome>) -> RunSummary {
        let mut summary = RunSummary::default();
        for outcome in outcomes {
            summary.processed += 1;
            match outcome {
                UrlOutcome::Extracted { .. } => summary.succeeded += 1,
                UrlOutcome::BadStatus { .. } => summary.bad_status += 1,
                UrlOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary.endpoints = self.state.endpoints.len();
        summary.parameters = self.state.parameters.len();
        summary
    }
}
