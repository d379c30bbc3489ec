//! Plan rendering

use colored::Colorize;
use rhoas_core::effect::Effect;
use rhoas_core::plan::Plan;
use rhoas_core::resource::Value;

pub fn format_effect(effect: &Effect) -> String {
    match effect {
        Effect::Create(r) => format!("Create {}", r.id),
        Effect::Replace { to, .. } => format!("Replace {}", to.id),
        Effect::Delete { id, .. } => format!("Delete {}", id),
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Map(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| *k);
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{} = {}", k, format_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

pub fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up-to-date.".green());
        return;
    }

    println!("{}", "Execution Plan:".cyan().bold());
    println!();

    for effect in plan.effects() {
        match effect {
            Effect::Create(resource) => {
                println!("  {} {}", "+".green().bold(), resource.id);
                let mut keys: Vec<&String> = resource.attributes.keys().collect();
                keys.sort();
                for key in keys {
                    println!(
                        "      {} = {}",
                        key,
                        format_value(&resource.attributes[key])
                    );
                }
            }
            Effect::Replace {
                to,
                changed_attributes,
                ..
            } => {
                let reason = if changed_attributes.is_empty() {
                    "tainted".to_string()
                } else {
                    format!("forces replacement: {}", changed_attributes.join(", "))
                };
                println!(
                    "  {} {} {}",
                    "-/+".yellow().bold(),
                    to.id,
                    format!("({})", reason).dimmed()
                );
            }
            Effect::Delete { id, identifier } => {
                println!(
                    "  {} {} {}",
                    "-".red().bold(),
                    id,
                    format!("({})", identifier).dimmed()
                );
            }
        }
    }

    println!();
    println!("{}", plan.summary());
}
