use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{bail, Context};
use tracing::{info, warn};

use crate::domain::cart::{SaveMergePolicy, MAX_ITEMS};

/// Runtime settings of the cart core
#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    /// Cap on the summed quantity of the current selection
    pub max_items: u32,
    pub merge_policy: SaveMergePolicy,
    /// Saved cart file; `None` keeps the saved cart in memory
    pub store_path: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            max_items: MAX_ITEMS,
            merge_policy: SaveMergePolicy::default(),
            store_path: None,
        }
    }
}

impl CartConfig {
    /// Load from `CART_MAX_ITEMS`, `CART_MERGE_POLICY` and `CART_STORE_PATH`
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_items = try_load(&lookup, "CART_MAX_ITEMS", defaults.max_items)?;
        if max_items == 0 {
            bail!("CART_MAX_ITEMS must be at least 1");
        }

        let merge_policy = try_load(&lookup, "CART_MERGE_POLICY", defaults.merge_policy)?;

        let store_path = lookup("CART_STORE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        if store_path.is_none() {
            info!("CART_STORE_PATH not set, saved cart kept in memory");
        }

        Ok(Self {
            max_items,
            merge_policy,
            store_path,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| {
                warn!("Invalid {key} value: {e}");
                anyhow::anyhow!("{e}")
            })
            .with_context(|| format!("Environment misconfigured: {key}={raw}")),
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}
