use crate::MetricsProvider;
use anyhow::{Context, Result};

/// Split a space-delimited list of names, keeping order and duplicates.
///
/// # Examples
///
/// ```
/// use elbmon_cloud::resources::split_names;
///
/// assert_eq!(split_names(" web  api web "), vec!["web", "api", "web"]);
/// assert!(split_names("   ").is_empty());
/// ```
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Load balancers to query: the explicit names when given, otherwise every
/// load balancer the provider lists.
pub async fn resolve_load_balancers(
    explicit: &[String],
    provider: &dyn MetricsProvider,
) -> Result<Vec<String>> {
    let names: Vec<String> = explicit
        .iter()
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .collect();
    if !names.is_empty() {
        tracing::debug!(count = names.len(), "Using configured load balancers");
        return Ok(names);
    }

    let names = provider
        .list_load_balancers()
        .await
        .with_context(|| format!("Failed to list load balancers from {}", provider.name()))?;
    tracing::info!(
        count = names.len(),
        provider = provider.name(),
        "Discovered load balancers"
    );
    Ok(names)
}
