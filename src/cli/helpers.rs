//! Shared helpers for CLI commands

use chrono::{DateTime, Utc};
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::core::config::Config;
use crate::core::fetch::{Fetcher, HttpCatalogSource};
use crate::core::project::Project;

/// Resolve the project from `--project` or by walking up from the cwd
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    project.map_err(|e| miette::miette!("{}", e))
}

/// Build the live-catalog fetcher from configuration
pub fn build_fetcher(config: &Config) -> Result<Fetcher> {
    let url = config.catalog_url.as_deref().ok_or_else(|| {
        miette::miette!(
            "No catalog URL configured. Set 'catalog_url' in .pacta/config.yaml or PACTA_CATALOG_URL"
        )
    })?;

    let source = HttpCatalogSource::new(url, config.request_timeout())
        .map_err(|e| miette::miette!("{}", e))?;
    Ok(Fetcher::new(Box::new(source), config.retry_policy()))
}

/// The groups a command operates on: the explicit one, or every configured one
pub fn resolve_groups(explicit: Option<String>, config: &Config) -> Result<Vec<String>> {
    match explicit {
        Some(group) => Ok(vec![group]),
        None if !config.group_codes.is_empty() => Ok(config.group_codes.clone()),
        None => Err(miette::miette!(
            "No group given and no 'group_codes' configured. Pass --group or edit .pacta/config.yaml"
        )),
    }
}

/// Human-readable cache age, e.g. "3h ago" or "never refreshed"
pub fn format_age(refreshed_at: Option<DateTime<Utc>>) -> String {
    let Some(at) = refreshed_at else {
        return "never refreshed".to_string();
    };

    let elapsed = Utc::now().signed_duration_since(at);
    if elapsed.num_days() > 0 {
        format!("{}d ago", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}min ago", elapsed.num_minutes())
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_groups_prefers_explicit() {
        let config = Config {
            group_codes: vec!["787000".to_string()],
            ..Default::default()
        };
        let groups = resolve_groups(Some("787010".to_string()), &config).unwrap();
        assert_eq!(groups, vec!["787010".to_string()]);
    }

    #[test]
    fn test_resolve_groups_requires_something() {
        let config = Config::default();
        assert!(resolve_groups(None, &config).is_err());
    }

    #[test]
    fn test_format_age_never() {
        assert_eq!(format_age(None), "never refreshed");
    }
}
