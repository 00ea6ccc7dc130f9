//! Model introspection command

use anyhow::Result;
use clarity_core::classifier::Rule;
use clarity_core::{ClarityConfig, ModelContext, RuleCascade};

pub fn cmd_model_info(model: Option<&ModelContext>, config: &ClarityConfig) -> Result<()> {
    match model {
        Some(model) => {
            println!("🧠 Model: {}", model.model_name());
            println!("   Categories: {}", model.categories().join(", "));
            println!("   Features ({}):", model.feature_names().len());
            for name in model.feature_names() {
                println!("     - {}", name);
            }
            println!("   Class mapping:");
            for (index, category) in model.category_mapping() {
                println!("     {} → {}", index, category);
            }
        }
        None => println!("🧠 No model loaded (rules only)"),
    }

    println!();
    println!("📏 Rules (first match wins):");
    let descriptions = RuleCascade::new(config.rules.clone()).describe();
    for rule in Rule::cascade() {
        if let Some(text) = descriptions.get(&rule.category().to_lowercase()) {
            println!("   {:<10} {:.2}  {}", rule.category(), rule.confidence(), text);
        }
    }
    Ok(())
}
