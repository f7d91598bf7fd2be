use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::corpus::{Corpus, UnitKind};
use crate::file_utils::FileManager;
use crate::knowledge::{GlossaryRecord, NameAuthority, NameRecord, TermGlossary};
use crate::qa_service::QaService;
use crate::report::QaReport;

// @module: Application controller for QA runs

/// Input and output paths for one audit run
#[derive(Debug, Clone)]
pub struct AuditPaths {
    /// Key unit records (JSON array), optional
    pub keys: Option<PathBuf>,

    /// Description unit records (JSON array), optional
    pub descriptions: Option<PathBuf>,

    /// Glossary records (JSON array), optional
    pub glossary: Option<PathBuf>,

    /// Name-authority records (JSON array), optional
    pub names: Option<PathBuf>,

    /// Report output path
    pub out: PathBuf,
}

/// Main application controller for QA audit runs
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run the audit: load inputs, score the corpus, write the report
    pub async fn run(&self, paths: &AuditPaths, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if paths.keys.is_none() && paths.descriptions.is_none() {
            return Err(anyhow!(
                "Nothing to audit: provide at least one of --keys / --descriptions"
            ));
        }

        // Check if a report already exists
        if paths.out.exists() && !force_overwrite {
            warn!(
                "Skipping run, report already exists (use -f to force overwrite): {:?}",
                paths.out
            );
            return Ok(());
        }

        let corpus = self.load_corpus(paths)?;
        if corpus.is_empty() {
            warn!("Input files contained no units; writing an empty report");
        }

        let glossary = Arc::new(self.load_glossary(paths.glossary.as_deref())?);
        let authority = Arc::new(self.load_authority(paths.names.as_deref())?);

        info!(
            "Auditing {} unit(s) against {} glossary key(s), {} authority entr(ies)",
            corpus.len(),
            glossary.len(),
            authority.len()
        );

        let progress_bar = ProgressBar::new(corpus.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );

        let service = QaService::with_config(self.config.clone());
        let callback_bar = progress_bar.clone();
        let outcome = service
            .run(&corpus, glossary.clone(), authority.clone(), move |current, _| {
                callback_bar.set_position(current as u64);
            })
            .await?;
        progress_bar.finish_and_clear();

        let report = QaReport::build(
            &outcome,
            &self.config,
            &glossary,
            &authority,
            chrono::Local::now(),
        );

        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize QA report")?;
        FileManager::write_string(&paths.out, &json)?;

        for summary in &report.kpi_summary {
            info!(
                "{}: {} rows, translated {}, critical pass {}, term recall {}",
                summary.block,
                summary.n_rows,
                format_rate(summary.translated_rate),
                format_rate(summary.critical_pass_rate),
                format_rate(summary.mean_term_recall_when_hit),
            );
        }
        if !report.term_drift.is_empty() {
            info!("{} term(s) with drifting renderings", report.term_drift.len());
        }
        if !report.diagnostics.is_empty() {
            warn!("{} unit(s) excluded, see diagnostics", report.diagnostics.len());
        }

        info!(
            "Report written to {:?} in {:.2?}",
            paths.out,
            start_time.elapsed()
        );

        Ok(())
    }

    /// Load key and description units into one corpus
    fn load_corpus(&self, paths: &AuditPaths) -> Result<Corpus> {
        let mut corpus = Corpus::new();

        if let Some(path) = &paths.keys {
            let content = FileManager::read_to_string(path)?;
            let units = Corpus::parse_json(UnitKind::Key, &content)
                .with_context(|| format!("Failed to load key units from {:?}", path))?;
            corpus.extend(units);
        }

        if let Some(path) = &paths.descriptions {
            let content = FileManager::read_to_string(path)?;
            let units = Corpus::parse_json(UnitKind::Description, &content)
                .with_context(|| format!("Failed to load description units from {:?}", path))?;
            corpus.extend(units);
        }

        debug!("Loaded corpus of {} unit(s)", corpus.len());
        Ok(corpus)
    }

    /// Load the glossary; a missing file yields an empty glossary
    fn load_glossary(&self, path: Option<&Path>) -> Result<TermGlossary> {
        let Some(path) = path else {
            warn!("No glossary supplied; term recall will find no hits");
            return Ok(TermGlossary::empty());
        };

        let content = FileManager::read_to_string(path)?;
        let records: Vec<GlossaryRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse glossary records from {:?}", path))?;

        Ok(TermGlossary::build(&records))
    }

    /// Load the name authority; a missing file yields an empty authority
    fn load_authority(&self, path: Option<&Path>) -> Result<NameAuthority> {
        let Some(path) = path else {
            warn!("No name authority supplied; no rows will be name-verifiable");
            return Ok(NameAuthority::empty());
        };

        let content = FileManager::read_to_string(path)?;
        let records: Vec<NameRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse name records from {:?}", path))?;

        // Structural problems (duplicate keys) are fatal: silently picking
        // one entry would make name accuracy numbers wrong
        NameAuthority::build(&records)
            .with_context(|| format!("Invalid name authority in {:?}", path))
    }
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{:.1}%", value * 100.0),
        None => "n/a".to_string(),
    }
}
