//! Analysis command

use std::path::Path;

use anyhow::{Context, Result};
use clarity_core::{
    import::read_records, AnalysisReport, Analyzer, ClarityConfig, ClassificationEngine,
};

pub fn cmd_analyze(
    engine: &ClassificationEngine,
    config: &ClarityConfig,
    file: &Path,
    json: bool,
) -> Result<()> {
    let records = read_records(file)
        .with_context(|| format!("Failed to read transactions from {}", file.display()))?;

    let analyzer = Analyzer::from_config(engine.clone(), config);
    let report = analyzer.analyze_records(records)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

/// Human-readable report
pub fn render_report(report: &AnalysisReport) -> String {
    let health = &report.budget_health;
    let cushion = &report.financial_cushion;
    let mut out = String::new();

    out.push_str(&format!(
        "💚 Budget health: {}/100 ({})\n   {}\n\n",
        health.score, health.status, health.description
    ));
    out.push_str(&format!(
        "💰 Monthly income: {}   expense: {}\n",
        report.metrics.monthly_income, report.metrics.monthly_expense
    ));
    out.push_str(&format!(
        "🔮 Next month forecast: {:.2} ({})\n\n",
        report.ml_forecast.predicted_expense_next_month, report.ml_forecast.model_used
    ));

    out.push_str(&format!(
        "🛟 Cushion: {:.0} of {:.0} ({:.1}%) - {}, {}\n",
        cushion.current_amount,
        cushion.target_amount,
        cushion.progress_percent,
        cushion.risk_label,
        cushion.reasoning
    ));

    let mandatory = &report.mandatory_expenses;
    if mandatory.categories.is_empty() {
        out.push_str("📌 Mandatory expenses: none detected\n");
    } else {
        out.push_str(&format!(
            "📌 Mandatory expenses: {:.0}/month ({})\n",
            mandatory.total,
            mandatory.categories.join(", ")
        ));
    }

    if report.optimization_plan.is_empty() {
        out.push_str("\n✅ No optimization suggestions\n");
    } else {
        out.push_str("\n✂️  Optimization plan:\n");
        for advice in &report.optimization_plan {
            out.push_str(&format!("   {} {}\n", advice.action, advice.recommendation));
        }
    }

    out
}
