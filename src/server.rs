use crate::err::{AppliesTo, Error, IoErrorExt};
use crate::handler::Handler;
use http_body_util::BodyExt;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Serve `handler` on `addr` until Ctrl-C.
pub async fn run_simple_server<H: Handler>(addr: SocketAddr, handler: H) -> Result<(), io::Error> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    serve_on(listener, handler, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    log::info!("Shutting down");
    Ok(())
}

/// Accept connections on `listener` and answer every request with `handler`, until `shutdown` resolves.
///
/// Connections already accepted keep running on their own tasks.
pub async fn serve_on<H: Handler>(
    mut listener: TcpListener,
    handler: H,
    shutdown: impl Future<Output = ()>,
) -> Result<(), io::Error> {
    let handler = Arc::new(handler);
    tokio::pin!(shutdown);

    loop {
        let tcp = tokio::select! {
            () = &mut shutdown => return Ok(()),
            tcp = accept(&mut listener) => tcp?,
        };
        let io = TokioIo::new(tcp);

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let serve = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                let handler = Arc::clone(&handler);
                async move {
                    let req = req.map(|body| body.map_err(Error::from).boxed());
                    Ok::<_, Infallible>(handler.call(req).await)
                }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(io, serve)
                .await
            {
                log::error!("Error serving connection: {}", e);
            }
        });
    }
}

async fn accept(listener: &mut TcpListener) -> Result<TcpStream, io::Error> {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) => match e.applies_to() {
                AppliesTo::Connection => log::debug!("Aborted connection dropped: {}", e),
                AppliesTo::Listener => return Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::hello::hello;
    use crate::resolve::map::map_handler;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::oneshot;

    async fn roundtrip(addr: SocketAddr, path: &str) -> String {
        let mut tcp = TcpStream::connect(addr).await.unwrap();
        tcp.write_all(
            format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path)
                .as_bytes(),
        )
        .await
        .unwrap();
        let mut resp = String::new();
        tcp.read_to_string(&mut resp).await.unwrap();
        resp.to_ascii_lowercase()
    }

    #[tokio::test]
    async fn serves_redirects_and_fallback_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler = map_handler(
            HashMap::from([("/a".to_string(), "https://example.com/a".to_string())]),
            handler_fn(hello),
        );
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_on(listener, handler, async move {
            let _ = stopped.await;
        }));

        let resp = roundtrip(addr, "/a").await;
        assert!(resp.starts_with("http/1.1 302"), "{}", resp);
        assert!(resp.contains("location: https://example.com/a\r\n"), "{}", resp);

        let resp = roundtrip(addr, "/b").await;
        assert!(resp.starts_with("http/1.1 200"), "{}", resp);
        assert!(resp.ends_with("\r\n\r\nhello, world!\n"), "{}", resp);

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
