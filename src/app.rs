use std::path::Path;

use crate::collector::PostSource;
use crate::config::Config;
use crate::dataset;
use crate::db::Repository;
use crate::error::Result;
use crate::models::Post;
use crate::pipeline::{
    normalize_with_report, CleaningReport, CleaningRules, FrequencyTable, LabelCounts, TextFilter,
};
use crate::report::Report;
use crate::sentiment::{score_posts, NaiveBayesModel, SentimentScorer};

const SMOOTHING: f64 = 1.0;

pub struct App {
    config: Config,
    rules: CleaningRules,
    filter: TextFilter,
    repository: Repository,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let repository = Repository::new(&config.db_path).await?;
        Ok(Self {
            config,
            rules: CleaningRules::default(),
            filter: TextFilter::spanish(),
            repository,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches posts, archives them and writes the raw CSV.
    pub async fn collect<S: PostSource>(&self, source: &S) -> Result<Vec<Post>> {
        let query = self.config.search_query();
        let posts = source.fetch(&query).await?;

        self.repository.upsert_posts(posts.clone()).await?;
        dataset::write_raw(&self.config.raw_csv_path(), &posts)?;

        tracing::info!(
            collected = posts.len(),
            archived = self.repository.count_posts().await?,
            "Collection finished"
        );
        Ok(posts)
    }

    /// Cleans the raw CSV and writes the prepared CSV.
    pub fn prepare(&self) -> Result<(Vec<Post>, CleaningReport)> {
        let raw = dataset::read_posts(&self.config.raw_csv_path())?;
        let (cleaned, report) = normalize_with_report(&raw, &self.rules)?;
        dataset::write_prepared(&self.config.prepared_csv_path(), &cleaned)?;
        Ok((cleaned, report))
    }

    /// Full analysis: clean, count words, score, aggregate and report.
    pub async fn analyze<S>(&self, scorer: &S, top_k: usize) -> Result<Report>
    where
        S: SentimentScorer + ?Sized,
    {
        let (cleaned, cleaning) = self.prepare()?;

        let frequency = FrequencyTable::count(self.filter.corpus(&cleaned));
        if frequency.is_empty() {
            tracing::warn!("No words left after filtering");
        }
        tracing::info!(
            tokens = frequency.total(),
            distinct = frequency.len(),
            "Counted word frequencies"
        );

        let scored = score_posts(scorer, cleaned)?;
        let labels = LabelCounts::aggregate(scored.iter().map(|s| s.sentiment));

        dataset::write_scored(&self.config.scored_csv_path(), &scored)?;
        self.repository
            .save_sentiments(scored, scorer.name().to_string())
            .await?;

        let report = Report::build(scorer.name(), cleaning, &frequency, &labels, top_k);
        report.save(&self.config.report_path())?;
        Ok(report)
    }

    /// Fits the naive Bayes scorer on a `text,label` CSV and saves it to the
    /// configured model path.
    pub fn train(&self, labeled: &Path) -> Result<NaiveBayesModel> {
        let rows = dataset::read_labeled(labeled)?;
        if rows.is_empty() {
            return Err(anyhow::anyhow!("no labeled rows in {}", labeled.display()).into());
        }
        let name = format!(
            "naive-bayes-{}",
            labeled
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "es".to_string())
        );
        let model = NaiveBayesModel::fit(
            name,
            rows.iter().map(|(text, positive)| (text.as_str(), *positive)),
            SMOOTHING,
        )?;
        model.save(Path::new(&self.config.model_path))?;
        tracing::info!(path = %self.config.model_path, "Saved sentiment model");
        Ok(model)
    }

    pub fn load_scorer(&self) -> Result<NaiveBayesModel> {
        NaiveBayesModel::load(Path::new(&self.config.model_path))
    }
}
