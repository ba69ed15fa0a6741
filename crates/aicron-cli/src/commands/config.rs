use anyhow::bail;

use aicron_store::JobStore;

/// Print every configured key, sorted.
pub fn config_list(store: &JobStore) -> anyhow::Result<()> {
    let entries = store.config_all()?;
    if entries.is_empty() {
        println!("No configuration set");
        return Ok(());
    }
    for (key, value) in entries {
        println!("{key}: {value}");
    }
    Ok(())
}

pub fn config_get(store: &JobStore, key: &str) -> anyhow::Result<()> {
    match store.config_get(key)? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!("Config key '{key}' not found"),
    }
}

pub fn config_set(store: &JobStore, key: &str, value: &str) -> anyhow::Result<()> {
    store.config_set(key, value)?;
    println!("Set {key} = {value}");
    Ok(())
}

pub fn config_delete(store: &JobStore, key: &str) -> anyhow::Result<()> {
    store.config_delete(key)?;
    println!("Deleted {key}");
    Ok(())
}
