use crate::chain;
use crate::config::BUILTIN_REDIRECTS;
use crate::err::Error;
use crate::handler::{handler_fn, BoxedHandler};
use crate::hello::hello;
use crate::opt::{self, Mapping};
use crate::resolve::map::MapResolver;
use crate::resolve::rules;
use crate::resolve::store::StoreResolver;
use crate::resolve::BoxedResolver;
use crate::server::run_simple_server;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn main(options: opt::Options) -> Result<(), Error> {
    let opt::Options {
        verbose: _,
        listen,
        config,
        db,
        map,
    } = options;

    let yaml = tokio::fs::read(&config)
        .await
        .map_err(|e| format!("{}: {}", config.display(), e))?;

    let handler =
        build(&yaml, db, map).map_err(|e| format!("{}: {}", config.display(), e))?;

    run_simple_server(listen, handler).await?;

    Ok(())
}

/// Resolution order: store, then rule file, then static map, then the greeting.
fn build(
    yaml: &[u8],
    db: PathBuf,
    map: Vec<Mapping>,
) -> Result<BoxedHandler, rules::RuleSetError> {
    let rules = rules::load(yaml)?;
    log::info!("Loaded {} rules", rules.len());

    let statics = BUILTIN_REDIRECTS
        .iter()
        .map(|(path, url)| (path.to_string(), url.to_string()))
        .chain(map.into_iter().map(|Mapping { path, url }| (path, url)))
        .collect::<MapResolver>();

    log::info!("Reading redirects from {}", db.display());
    let resolvers: [BoxedResolver; 3] = [
        Box::new(StoreResolver::new(db)),
        Box::new(rules),
        Box::new(statics),
    ];

    Ok(chain::compose(resolvers, Arc::new(handler_fn(hello))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{self, BoxedBody};
    use crate::handler::Handler;
    use crate::resolve::map::map_handler;
    use crate::resolve::rules::yaml_handler;
    use crate::resolve::store::{populate, store_handler};
    use http::{header, Request, Response, StatusCode};
    use std::collections::HashMap;

    const RULES: &str = "
- path: /urlshort
  url: https://github.com/gophercises/urlshort
- path: /urlshort-final
  url: https://github.com/gophercises/urlshort/tree/solution
";

    fn get(path: &str) -> Request<BoxedBody> {
        Request::get(path).body(body::empty()).unwrap()
    }

    fn location(resp: &Response<BoxedBody>) -> &str {
        resp.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn built_chain_resolves_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("redirect.db");
        populate(
            &db,
            &[
                ("/stored", "https://example.com/stored".as_bytes()),
                ("/urlshort", "https://example.com/from-store".as_bytes()),
            ],
        );
        let extra = vec![Mapping {
            path: "/yaml-godoc".to_string(),
            url: "https://docs.rs/serde_yaml".to_string(),
        }];

        let handler = build(RULES.as_bytes(), db, extra).unwrap();

        let resp = handler.call(get("/stored")).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "https://example.com/stored");

        // store shadows the rule file
        let resp = handler.call(get("/urlshort")).await;
        assert_eq!(location(&resp), "https://example.com/from-store");

        let resp = handler.call(get("/urlshort-final")).await;
        assert_eq!(
            location(&resp),
            "https://github.com/gophercises/urlshort/tree/solution"
        );

        let resp = handler.call(get("/urlshort-godoc")).await;
        assert_eq!(
            location(&resp),
            "https://godoc.org/github.com/gophercises/urlshort"
        );

        // command line entries replace built-in ones
        let resp = handler.call(get("/yaml-godoc")).await;
        assert_eq!(location(&resp), "https://docs.rs/serde_yaml");

        let resp = handler.call(get("/pouet")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body::to_string(resp.into_body()).await, "Hello, world!\n");
    }

    #[test]
    fn bad_rule_file_fails_build() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("redirect.db");
        assert!(build(b"- path: /only-a-path\n", db, Vec::new()).is_err());
    }

    #[tokio::test]
    async fn missing_rule_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let options = opt::Options {
            verbose: 0,
            listen: "127.0.0.1:0".parse().unwrap(),
            config: dir.path().join("missing.yaml"),
            db: dir.path().join("redirect.db"),
            map: Vec::new(),
        };
        let e = main(options).await.unwrap_err();
        assert!(e.to_string().contains("missing.yaml"), "{}", e);
    }

    #[tokio::test]
    async fn nested_handlers_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let paths_to_urls = HashMap::from([
            (
                "/urlshort-godoc".to_string(),
                "https://godoc.org/github.com/gophercises/urlshort".to_string(),
            ),
            (
                "/yaml-godoc".to_string(),
                "https://godoc.org/gopkg.in/yaml.v2".to_string(),
            ),
        ]);
        let by_map = map_handler(paths_to_urls, handler_fn(hello));
        let by_rules = yaml_handler(RULES.as_bytes(), by_map).unwrap();
        let handler = store_handler(dir.path().join("redirect.db"), by_rules);

        let resp = handler.call(get("/urlshort")).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "https://github.com/gophercises/urlshort");

        let resp = handler.call(get("/urlshort-godoc")).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            location(&resp),
            "https://godoc.org/github.com/gophercises/urlshort"
        );

        let resp = handler.call(get("/pouet")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body::to_string(resp.into_body()).await, "Hello, world!\n");
    }
}
