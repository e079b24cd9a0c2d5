use crate::handler::Handler;
use crate::resolve::map::MapResolver;
use crate::resolve::Redirect;
use serde::Deserialize;
use std::collections::HashMap;

/// One `path` / `url` record of a rule file.
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub path: String,
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("invalid rule set: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn parse_rules(yaml: &[u8]) -> Result<Vec<Rule>, RuleSetError> {
    if yaml.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_slice(yaml)?)
}

/// Later rules replace earlier ones with the same path.
pub fn build_map(rules: Vec<Rule>) -> HashMap<String, String> {
    rules.into_iter().map(|r| (r.path, r.url)).collect()
}

pub fn load(yaml: &[u8]) -> Result<MapResolver, RuleSetError> {
    Ok(MapResolver::new(build_map(parse_rules(yaml)?)))
}

/// Parse `yaml` as a rule list and redirect its paths, passing everything else to `fallback`.
///
/// Fails only if `yaml` is not a list of `path` / `url` records; no handler is built in that case.
pub fn yaml_handler<F: Handler>(
    yaml: &[u8],
    fallback: F,
) -> Result<Redirect<MapResolver, F>, RuleSetError> {
    Ok(Redirect::new(load(yaml)?, fallback))
}
