//! Integration tests for clarity-core
//!
//! These tests exercise the full load → classify → analyze workflow against
//! the model artifacts shipped in `models/`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clarity_core::{
    analysis::{HealthStatus, HISTORICAL_MEAN},
    batch::classify_batch,
    import::read_records,
    Analyzer, ClarityConfig, ClassificationEngine, ModelContext, PredictionMethod, Transaction,
    TransactionRecord,
};

fn bundled_model_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models")
}

fn engine() -> ClassificationEngine {
    let context = ModelContext::load(&bundled_model_dir()).expect("Failed to load bundled model");
    let config = ClarityConfig::embedded().expect("Embedded config must parse");
    ClassificationEngine::new(config.rules, Some(Arc::new(context)))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three months of salary, rent, a fixed bill and varying daily food
fn three_month_history() -> Vec<Transaction> {
    let mut txs = Vec::new();
    for month in 1..=3 {
        txs.push(Transaction::new(date(2025, month, 10), 60000.0, "CHAS PAYROLL"));
        txs.push(Transaction::new(date(2025, month, 1), -20000.0, "LANDLORD"));
        txs.push(Transaction::new(date(2025, month, 15), -1200.0, "ISP"));
        for day in 1..=28 {
            let amount = -(100.5 + 37.0 * (day % 7) as f64);
            txs.push(Transaction::new(date(2025, month, day), amount, "CAFE"));
        }
    }
    txs
}

// =============================================================================
// Model loading + classification
// =============================================================================

#[test]
fn test_bundled_model_loads() {
    let context = ModelContext::load(&bundled_model_dir()).expect("Failed to load bundled model");

    assert_eq!(context.categories().len(), 6);
    assert_eq!(context.feature_columns().len(), 14);
    assert_eq!(context.category_for(2), Some("Rent"));
}

#[test]
fn test_large_first_week_payment_goes_to_model() {
    let tx = Transaction::new(date(2025, 3, 3), -30000.0, "").mandatory();
    let result = engine().classify(&tx);

    assert_eq!(result.category, "Rent");
    assert_eq!(result.method, PredictionMethod::Ml);
    assert!(!result.is_rule_based);
    assert!((result.confidence - 1.6 / 3.0).abs() < 1e-9);
}

#[test]
fn test_small_whole_expense_uses_model_features() {
    // Thursday, mid-month, exported account id in the reference
    let tx = Transaction::new(date(2025, 3, 20), -5.0, "POS 4.5E+11");
    let result = engine().classify(&tx);

    assert_eq!(result.category, "Food");
    assert_eq!(result.method, PredictionMethod::Ml);
    assert!((result.confidence - 0.3).abs() < 1e-9);
}

#[test]
fn test_rules_win_over_model() {
    let engine = engine();

    let salary = engine.classify(&Transaction::new(date(2025, 3, 15), 6000.0, "X"));
    assert_eq!(salary.category, "Salary");
    assert_eq!(salary.confidence, 0.99);
    assert_eq!(salary.method, PredictionMethod::Rule);

    let fare = engine.classify(&Transaction::new(date(2025, 3, 15), -3062.0, ""));
    assert_eq!(fare.category, "Transport");
    assert_eq!(fare.confidence, 0.97);
}

#[test]
fn test_batch_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "date,amount,ref_no").unwrap();
    writeln!(file, "2025-03-15,6000,X").unwrap();
    writeln!(file, ",-20,NO DATE").unwrap();
    writeln!(file, "2025-03-03T09:15:00Z,-30000,").unwrap();
    drop(file);

    let records = read_records(&path).expect("Failed to read CSV");
    let response = classify_batch(&engine(), records);

    assert_eq!(response.summary.total, 3);
    assert_eq!(response.summary.successful, 2);
    assert_eq!(response.summary.failed, 1);
    assert!(!response.results[1].success);
    let third = response.results[2].prediction.as_ref().unwrap();
    assert_eq!(third.method, PredictionMethod::Ml);
    for item in response.results.iter().filter_map(|r| r.prediction.as_ref()) {
        assert!((0.0..=1.0).contains(&item.confidence));
    }
}

// =============================================================================
// Analysis workflow
// =============================================================================

#[test]
fn test_full_analysis_workflow() {
    let config = ClarityConfig::embedded().unwrap();
    let analyzer = Analyzer::from_config(engine(), &config);
    let report = analyzer.analyze(three_month_history()).expect("Analysis failed");

    assert_eq!(report.metrics.monthly_income, 60000);
    assert_eq!(report.metrics.monthly_expense, 27122);

    assert_eq!(report.budget_health.score, 54);
    assert_eq!(report.budget_health.status, HealthStatus::Excellent);
    assert_eq!(report.budget_health.spent_percent, 45.2);
    assert_eq!(report.budget_health.saved_percent, 54.8);

    // Rent and the fixed bill repeat exactly; food varies daily
    assert_eq!(
        report.mandatory_expenses.categories,
        vec!["Rent".to_string(), "Shopping".to_string()]
    );
    assert_eq!(report.mandatory_expenses.total, 21200.0);

    let cushion = &report.financial_cushion;
    assert_eq!(cushion.target_amount, 77200.0);
    assert_eq!(cushion.target_amount % 100.0, 0.0);
    assert_eq!(cushion.months_target, 3);
    assert_eq!(cushion.current_amount, 98634.0);
    assert_eq!(cushion.progress_percent, 127.8);

    assert_eq!(report.ml_forecast.model_used, "trend_seasonal");
    assert!(report.ml_forecast.predicted_expense_next_month > 0.0);

    assert_eq!(report.optimization_plan.len(), 1);
    assert_eq!(report.optimization_plan[0].category, "Food");
    assert_eq!(report.optimization_plan[0].current_spend, 5922.0);
}

#[test]
fn test_analysis_of_raw_records() {
    let records: Vec<TransactionRecord> = serde_json::from_str(
        r#"[
            {"date":"2025-12-09T00:00:00Z","amount":-300,"ref_no":"TEST","category":"Food"},
            {"date":"2025-12-10T00:00:00Z","amount":50000,"ref_no":"SALARY","category":"Salary"},
            {"date":"2025-12-01T00:00:00Z","amount":-30000,"ref_no":"RENT","category":"Rent",
             "is_essential":true}
        ]"#,
    )
    .unwrap();

    let report = Analyzer::default().analyze_records(records).unwrap();
    assert_eq!(report.ml_forecast.model_used, HISTORICAL_MEAN);
    assert_eq!(report.mandatory_expenses.categories, vec!["Rent".to_string()]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["budget_health"]["status"], "Stable");
    assert_eq!(json["financial_cushion"]["risk_label"], "stable income");
    assert!(json["optimization_plan"].as_array().unwrap().is_empty());
}

#[test]
fn test_empty_analysis_is_rejected() {
    let err = Analyzer::default().analyze(Vec::new()).unwrap_err();
    assert!(err.is_validation());
}
