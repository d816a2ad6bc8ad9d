//! CLI commands for the translation sheet workflow

use anyhow::bail;
use std::path::Path;

use taletree::loca::{
    LanguageRegistry, SheetFormat, export_sheet, export_sheet_with_existing, import_sheet,
};

fn load_registry(dir: &Path) -> anyhow::Result<LanguageRegistry> {
    let mut registry = LanguageRegistry::new();
    registry.add_source(dir);
    registry.load_all()?;
    Ok(registry)
}

pub fn export(
    dir: &Path,
    language: &str,
    output: &Path,
    format: SheetFormat,
    with_existing: Option<&str>,
) -> anyhow::Result<()> {
    let registry = load_registry(dir)?;
    let Some(source) = registry.get(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    let rows = match with_existing {
        Some(target_name) => {
            let Some(target) = registry.get(target_name) else {
                bail!("language '{target_name}' not found in {}", dir.display());
            };
            export_sheet_with_existing(source, target, output, format)?
        }
        None => export_sheet(source, output, format)?,
    };

    println!("Exported {rows} rows to {}", output.display());
    Ok(())
}

pub fn import(dir: &Path, language: &str, input: &Path, format: SheetFormat) -> anyhow::Result<()> {
    let mut registry = load_registry(dir)?;
    let Some(store) = registry.get_mut(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    let report = import_sheet(store, input, format)?;
    registry.save_all(dir)?;

    println!(
        "Imported into '{language}': {} translated, {} empty rows skipped",
        report.translated, report.skipped
    );
    if report.not_found > 0 {
        println!(
            "{} keys were not found: {}",
            report.not_found,
            report.missing_keys.join(", ")
        );
    }
    Ok(())
}
