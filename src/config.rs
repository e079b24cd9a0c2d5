pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_RULES_FILE: &str = "config.yaml";
pub const DEFAULT_STORE_FILE: &str = "redirect.db";

/// Name of the store table holding `path -> url` records.
pub const REDIRECTS_TABLE: &str = "redirects";

pub const BUILTIN_REDIRECTS: &[(&str, &str)] = &[
    (
        "/urlshort-godoc",
        "https://godoc.org/github.com/gophercises/urlshort",
    ),
    ("/yaml-godoc", "https://godoc.org/gopkg.in/yaml.v2"),
];
