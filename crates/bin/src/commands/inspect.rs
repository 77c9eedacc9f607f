//! The `inspect` subcommand: debug view of one instance document.

use hobart_xbrl::InstanceDocument;
use std::collections::BTreeMap;
use std::path::Path;

pub(crate) fn run(instance: &Path, per_context: usize) -> Result<(), Box<dyn std::error::Error>> {
    let xml = std::fs::read_to_string(instance)?;
    let doc = InstanceDocument::parse(&xml)?;

    println!("Document: {}", instance.display());
    println!(
        "DocumentType={} PeriodEnd={} FY={} FP={} Amendment={}",
        doc.meta.document_type.as_deref().unwrap_or("?"),
        doc.meta
            .period_end
            .map_or_else(|| "?".to_string(), |d| d.to_string()),
        doc.meta.fiscal_year.as_deref().unwrap_or("?"),
        doc.meta.fiscal_period.as_deref().unwrap_or("?"),
        doc.meta.amendment_flag.as_deref().unwrap_or("?"),
    );
    println!("{} contexts, {} facts\n", doc.contexts.len(), doc.facts.len());

    let mut by_context: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for fact in &doc.facts {
        by_context
            .entry(fact.context_ref.as_str())
            .or_default()
            .push((fact.concept.as_str(), fact.value.as_str()));
    }

    for (context_id, facts) in &by_context {
        println!("=== Context {context_id} ({} facts) ===", facts.len());
        match doc.context(context_id) {
            Some(ctx) => {
                match (ctx.start_date, ctx.end_date, ctx.instant) {
                    (Some(start), Some(end), _) => println!("  period: {start} .. {end}"),
                    (_, _, Some(instant)) => println!("  instant: {instant}"),
                    _ => println!("  period: (none)"),
                }
                if ctx.is_consolidated() {
                    println!("  consolidated (no dimensions)");
                }
                for (axis, member) in &ctx.dims {
                    println!("  dim: {axis} = {member}");
                }
            }
            None => println!("  (unresolved context reference)"),
        }

        for (concept, value) in facts.iter().take(per_context) {
            println!("    {concept:<70} {}", truncate(value, 60));
        }
        if facts.len() > per_context {
            println!("    ... and {} more", facts.len() - per_context);
        }
        println!();
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{cut}...")
}
