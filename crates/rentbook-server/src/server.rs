//! The HTTP/1 accept loop

use std::future::Future;
use std::sync::Arc;

use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::response::{failure, ApiError, Reply};
use crate::router::{route, AppState};

/// Largest request body accepted
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Serve connections from `listener` until `shutdown` resolves
///
/// Connections already accepted run to completion on their own tasks.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "connection accepted");
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        if let Err(err) = serve_connection(stream, state).await {
                            debug!(%peer, error = %err, "connection closed with error");
                        }
                    });
                }
                Err(err) => error!(error = %err, "accept failed"),
            }
        }
    }
}

async fn serve_connection(stream: TcpStream, state: Arc<AppState>) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let state = Arc::clone(&state);
        async move { Ok::<_, hyper::Error>(handle(req, &state).await) }
    });
    http1::Builder::new().serve_connection(io, service).await
}

/// Buffer the body, then route
async fn handle(req: Request<Incoming>, state: &AppState) -> Reply {
    let (parts, body) = req.into_parts();
    let bytes = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            debug!(error = %err, "failed to read request body");
            let mut reply = failure(&ApiError::bad_request(
                "Request body is too large or could not be read.",
            ));
            *reply.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
            return reply;
        }
    };
    route(Request::from_parts(parts, bytes), state).await
}
