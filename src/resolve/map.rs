use crate::handler::Handler;
use crate::resolve::{Redirect, Resolve};
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;

/// Exact-match lookup in a table fixed at construction.
#[derive(Debug, Default)]
pub struct MapResolver {
    table: HashMap<String, String>,
}

impl MapResolver {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(String, String)> for MapResolver {
    /// Later pairs replace earlier ones with the same path.
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Resolve for MapResolver {
    fn resolve<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>> {
        let target = self.table.get(path).cloned();
        if target.is_none() {
            log::debug!("{} -> [not in map]", path);
        }
        future::ready(target).boxed()
    }
}

/// Redirect paths found in `paths_to_urls`, and pass everything else to `fallback`.
pub fn map_handler<F: Handler>(
    paths_to_urls: HashMap<String, String>,
    fallback: F,
) -> Redirect<MapResolver, F> {
    Redirect::new(MapResolver::new(paths_to_urls), fallback)
}
