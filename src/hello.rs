use crate::body::{self, BoxedBody};
use headers::{ContentType, HeaderMapExt};
use http::{Request, Response};

const GREETING: &str = "Hello, world!\n";

/// The end of every chain: answers any request with a fixed greeting.
pub async fn hello(req: Request<BoxedBody>) -> Response<BoxedBody> {
    log::info!("{} -> [default]", req.uri().path());
    let mut resp = Response::new(body::full(GREETING));
    resp.headers_mut().typed_insert(ContentType::text_utf8());
    resp
}
