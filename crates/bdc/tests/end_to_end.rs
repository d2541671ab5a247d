//! Two filers through the pipeline into one database, then overlap analytics.

use async_trait::async_trait;
use bdc::analytics::{HoldingsMatrix, MatrixValue, PositionRow, write_common_holdings};
use bdc::extract::INVESTMENT_IDENTIFIER_AXIS;
use bdc::{
    BdcError, ExtractionStrategy, FactSet, FilerRef, FilingDescriptor, FilingSource, FormType, Job,
    JobStatus, Pipeline, PipelineConfig, PortfolioDatabase, Result, TaggedFact, XbrlContext,
};
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Debug)]
struct FixtureSource;

fn holding(ctx: &str, label: &str, fair_value: f64) -> (XbrlContext, TaggedFact) {
    (
        XbrlContext::new(ctx).with_dimension(INVESTMENT_IDENTIFIER_AXIS, label),
        TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", fair_value.to_string(), ctx)
            .with_numeric(fair_value),
    )
}

#[async_trait]
impl FilingSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn find_filing(
        &self,
        filer: &FilerRef,
        form: FormType,
        fiscal_year: Option<i32>,
    ) -> Result<FilingDescriptor> {
        let cik = match filer.as_str() {
            "ARCC" => "1287750",
            "FSK" => "1422183",
            other => {
                return Err(BdcError::FilingNotFound {
                    filer: other.to_string(),
                    form: form.to_string(),
                    year: fiscal_year,
                });
            }
        };
        Ok(FilingDescriptor {
            cik: cik.to_string(),
            accession_number: format!("000{cik}-25-000001"),
            filing_date: NaiveDate::from_ymd_opt(2025, 2, 26).unwrap(),
            form: form.to_string(),
            report_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            primary_document: None,
        })
    }

    async fn facts(&self, filing: &FilingDescriptor) -> Result<FactSet> {
        let holdings = if filing.cik == "1287750" {
            vec![
                holding("a1", "Acme Inc, Software 1", 100.0),
                holding("a2", "Beta Holdings LLC, Energy 1", 40.0),
            ]
        } else {
            vec![
                holding("f1", "Acme Corp, Software 1", 60.0),
                holding("f2", "Gamma Co, Healthcare 1", 25.0),
            ]
        };
        let (contexts, facts): (Vec<_>, Vec<_>) = holdings.into_iter().unzip();
        Ok(FactSet::new(facts, contexts))
    }

    async fn document(&self, _filing: &FilingDescriptor) -> Result<String> {
        Ok(String::new())
    }
}

#[tokio::test]
async fn test_pipeline_to_overlap() {
    let config = PipelineConfig {
        strategy: ExtractionStrategy::Xbrl,
        ..Default::default()
    };
    let db = Arc::new(PortfolioDatabase::in_memory().unwrap());
    let pipeline = Pipeline::new(Arc::new(FixtureSource), Arc::clone(&db), config);

    let jobs = Job::matrix(&["arcc".to_string(), "fsk".to_string(), "nope".to_string()], &[]);
    let summary = pipeline.run(&jobs).await;
    assert_eq!(summary.successes().count(), 2);
    assert_eq!(summary.outcomes[2].status, JobStatus::NoData);
    assert_eq!(summary.holdings_extracted(), 4);

    let counts = db.counts().unwrap();
    assert_eq!(counts.filers, 2);
    assert_eq!(counts.companies, 3);
    assert_eq!(counts.investments, 4);

    let overlap = db.overlap_companies(NaiveDate::from_ymd_opt(2024, 12, 31)).unwrap();
    assert_eq!(overlap.len(), 1);
    assert_eq!(overlap[0].company, "acme");
    assert_eq!(overlap[0].holders, vec!["ARCC".to_string(), "FSK".to_string()]);
    assert!((overlap[0].total_fair_value - 160.0).abs() < 1e-9);

    let holdings = db
        .holdings(NaiveDate::from_ymd_opt(2024, 12, 31))
        .unwrap();
    let rows: Vec<PositionRow> = holdings.iter().map(PositionRow::from).collect();
    let matrix = HoldingsMatrix::build(&rows, MatrixValue::Presence);
    assert_eq!(matrix.filers(), ["ARCC".to_string(), "FSK".to_string()]);
    assert_eq!(matrix.overlap_matrix().shared("ARCC", "FSK"), Some(1));

    let mut csv = Vec::new();
    write_common_holdings(&mut csv, &matrix.common_holdings(2)).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "company,holder_count,holders\nacme,2,\"ARCC, FSK\"\n"
    );

    // A second run writes nothing new.
    let rerun = pipeline.run(&jobs[..2]).await;
    assert!(rerun.outcomes.iter().all(|o| o.inserted == 0 && o.skipped == 2));
}
