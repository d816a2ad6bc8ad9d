//! CLI commands for managing language files

use anyhow::{Context, bail};
use std::path::Path;

use taletree::loca::LanguageRegistry;

/// Load every language file from a directory
fn load_registry(dir: &Path) -> anyhow::Result<LanguageRegistry> {
    let mut registry = LanguageRegistry::new();
    registry.add_source(dir);
    let count = registry
        .load_all()
        .with_context(|| format!("failed to load languages from {}", dir.display()))?;
    if count == 0 {
        bail!("no language files found in {}", dir.display());
    }
    Ok(registry)
}

/// Sync every other language against `language` and write everything back
fn sync_and_save(registry: &mut LanguageRegistry, language: &str, dir: &Path) -> anyhow::Result<()> {
    registry.set_selected(language)?;
    let report = registry.sync_selected()?;
    registry.save_all(dir)?;
    println!(
        "Synced {} languages against '{}': {} keys added, {} removed",
        report.languages_synced, report.source, report.keys_added, report.keys_removed
    );
    Ok(())
}

pub fn list(dir: &Path) -> anyhow::Result<()> {
    let registry = load_registry(dir)?;

    for store in registry.iter() {
        println!("{:<24} {} entries", store.name(), store.len());
    }
    Ok(())
}

pub fn keys(dir: &Path) -> anyhow::Result<()> {
    let registry = load_registry(dir)?;

    for key in registry.all_keys() {
        println!("{key}");
    }
    Ok(())
}

pub fn get(dir: &Path, language: &str, key: &str) -> anyhow::Result<()> {
    let registry = load_registry(dir)?;
    let Some(store) = registry.get(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    match store.get(key) {
        Some(value) => println!("{value}"),
        None => println!("(no entry for '{key}'; lookups fall back to the key)"),
    }
    Ok(())
}

pub fn set(dir: &Path, language: &str, key: &str, value: &str) -> anyhow::Result<()> {
    let mut registry = load_registry(dir)?;
    let Some(store) = registry.get_mut(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    store.set_value(key, value)?;
    registry.save_all(dir)?;
    println!("Set '{key}' in '{language}'");
    Ok(())
}

pub fn add_key(dir: &Path, language: &str, key: &str, value: &str) -> anyhow::Result<()> {
    let mut registry = load_registry(dir)?;
    let Some(store) = registry.get_mut(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    let stored = store.add(key, value);
    if stored != key {
        println!("Key '{key}' was taken, stored as '{stored}'");
    } else {
        println!("Added '{stored}' to '{language}'");
    }
    sync_and_save(&mut registry, language, dir)
}

pub fn remove_key(dir: &Path, language: &str, key: &str) -> anyhow::Result<()> {
    let mut registry = load_registry(dir)?;
    let Some(store) = registry.get_mut(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    match store.remove(key) {
        Some(_) => println!("Removed '{key}' from '{language}'"),
        None => println!("'{language}' has no key '{key}', nothing removed"),
    }
    sync_and_save(&mut registry, language, dir)
}

pub fn rename_key(dir: &Path, language: &str, old_key: &str, new_key: &str) -> anyhow::Result<()> {
    let mut registry = load_registry(dir)?;
    let Some(store) = registry.get_mut(language) else {
        bail!("language '{language}' not found in {}", dir.display());
    };

    let stored = store.rename(old_key, new_key)?;
    println!("Renamed '{old_key}' to '{stored}'");
    if stored != new_key {
        // Dialogue graphs referencing the requested name will not follow
        // the suffixed key.
        println!("Note: '{new_key}' was taken, the stored key is '{stored}'");
    }
    sync_and_save(&mut registry, language, dir)
}

pub fn sync(dir: &Path, language: &str) -> anyhow::Result<()> {
    let mut registry = load_registry(dir)?;
    sync_and_save(&mut registry, language, dir)
}
