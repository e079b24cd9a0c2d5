//! Path resolvers, and the handler that redirects on a hit or falls through on a miss.

use crate::body::{self, BoxedBody};
use crate::handler::Handler;
use futures::future::{BoxFuture, FutureExt};
use headers::{ContentType, HeaderMapExt};
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use percent_encoding::{utf8_percent_encode, CONTROLS};

pub mod map;
pub mod rules;
pub mod store;

/// Attempt to map a request path to a redirect target.
///
/// `None` is a deferral, not an error: whatever wraps the resolver moves on to its fallback.
pub trait Resolve: Send + Sync + 'static {
    fn resolve<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>>;
}

pub type BoxedResolver = Box<dyn Resolve>;

impl<R: Resolve + ?Sized> Resolve for Box<R> {
    fn resolve<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>> {
        (**self).resolve(path)
    }
}

/// Redirects with `302 Found` when `resolver` has a target, otherwise hands the request to `fallback`.
pub struct Redirect<R, F> {
    resolver: R,
    fallback: F,
}

impl<R: Resolve, F: Handler> Redirect<R, F> {
    pub fn new(resolver: R, fallback: F) -> Self {
        Self { resolver, fallback }
    }
}

impl<R: Resolve, F: Handler> Handler for Redirect<R, F> {
    fn call(&self, req: Request<BoxedBody>) -> BoxFuture<'_, Response<BoxedBody>> {
        async move {
            let target = self.resolver.resolve(req.uri().path()).await;

            let (target, location) = match target {
                Some(target) => {
                    let escaped = utf8_percent_encode(&target, CONTROLS).to_string();
                    match HeaderValue::try_from(escaped.as_str()) {
                        Ok(location) => {
                            log::info!("{} -> {}", req.uri().path(), target);
                            (escaped, location)
                        }
                        Err(e) => {
                            log::warn!(
                                "{} -> [invalid target] {:?} : {}",
                                req.uri().path(),
                                target,
                                e
                            );
                            return self.fallback.call(req).await;
                        }
                    }
                }
                None => return self.fallback.call(req).await,
            };

            let mut resp = if req.method() == Method::GET {
                Response::new(body::full(format!(
                    "<a href=\"{}\">Found</a>.\n\n",
                    escape_html(&target)
                )))
            } else {
                Response::new(body::empty())
            };
            *resp.status_mut() = StatusCode::FOUND;
            resp.headers_mut().insert(header::LOCATION, location);
            if req.method() == Method::GET || req.method() == Method::HEAD {
                resp.headers_mut().typed_insert(ContentType::html());
            }
            resp
        }
        .boxed()
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
