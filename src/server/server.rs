use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use futures::StreamExt;
use futures_channel::mpsc::{self, UnboundedSender};
use futures_channel::oneshot;
use snafu::prelude::*;
use tiny_http::{Header, Method, Request, Response};
use tracing::{debug, info, warn};

use crate::controller::{Controller, HttpMethod, HttpRequest, MAX_FORM_BYTES, Reply};

/// A fully read request waiting for the controller, and the way back to the
/// connection that sent it.
struct Exchange {
    request: HttpRequest,
    reply_sender: oneshot::Sender<Reply>,
}

/// HTTP front end. A dedicated thread accepts connections and hands each one
/// to its own thread, which reads the body and writes the response. Only
/// complete requests reach the async side, which handles them one at a time,
/// so a client that stalls mid-body holds up nobody but itself.
pub struct Server {
    http: Arc<tiny_http::Server>,
    controller: Controller,
}

impl Server {
    pub fn bind(address: SocketAddr, controller: Controller) -> Result<Self, ServerError> {
        let http = tiny_http::Server::http(address).map_err(|e| ServerError::BindError {
            address: address.to_string(),
            message: e.to_string(),
        })?;
        info!("Listening on {}", address);

        Ok(Self {
            http: Arc::new(http),
            controller,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serves requests until the listener shuts down and every open
    /// connection has been answered.
    pub async fn serve(self) -> Result<(), ServerError> {
        let (exchange_sender, mut exchange_receiver) = mpsc::unbounded::<Exchange>();

        let http = Arc::clone(&self.http);
        thread::Builder::new()
            .name("http-accept".to_string())
            .spawn(move || accept_requests(&http, exchange_sender))
            .context(AcceptThreadSnafu)?;

        while let Some(exchange) = exchange_receiver.next().await {
            self.dispatch(exchange);
        }

        info!("Listener closed, stopping server");
        Ok(())
    }

    fn dispatch(&self, exchange: Exchange) {
        let Exchange {
            request,
            reply_sender,
        } = exchange;
        let reply = self.controller.handle(&request);
        info!("{} {} -> {}", request.method, request.url, reply.status());

        if reply_sender.send(reply).is_err() {
            debug!("Connection for {} went away before the reply", request.url);
        }
    }
}

fn accept_requests(http: &tiny_http::Server, sender: UnboundedSender<Exchange>) {
    for request in http.incoming_requests() {
        if sender.is_closed() {
            debug!("Request handler is gone, stopping accept loop");
            break;
        }

        let sender = sender.clone();
        let spawned = thread::Builder::new()
            .name("http-request".to_string())
            .spawn(move || handle_connection(request, &sender));
        if let Err(e) = spawned {
            warn!("Failed to start a thread for the request: {}", e);
        }
    }
}

/// Runs on the connection's own thread: reads the request, waits for the
/// controller's reply and writes it back.
fn handle_connection(mut request: Request, sender: &UnboundedSender<Exchange>) {
    let http_request = read_request(&mut request);
    let (reply_sender, reply_receiver) = oneshot::channel();
    let exchange = Exchange {
        request: http_request,
        reply_sender,
    };
    if sender.unbounded_send(exchange).is_err() {
        debug!("Request handler is gone, dropping request");
        return;
    }

    match futures::executor::block_on(reply_receiver) {
        Ok(reply) => {
            if let Err(e) = request.respond(build_response(reply)) {
                debug!("Failed to send response: {}", e);
            }
        }
        Err(oneshot::Canceled) => debug!("Request was dropped without a reply"),
    }
}

fn read_request(request: &mut Request) -> HttpRequest {
    let method = match request.method() {
        Method::Get => HttpMethod::Get,
        Method::Head => HttpMethod::Head,
        Method::Post => HttpMethod::Post,
        _ => HttpMethod::Other,
    };

    let mut http_request = HttpRequest::new(method, request.url());
    http_request.cookie = header_value(request.headers(), "Cookie");
    http_request.if_none_match = header_value(request.headers(), "If-None-Match");

    if method == HttpMethod::Post {
        // One byte past the limit is enough for the controller to reject it.
        let limit = (MAX_FORM_BYTES + 1) as u64;
        if let Err(e) = request
            .as_reader()
            .take(limit)
            .read_to_end(&mut http_request.body)
        {
            warn!("Failed to read request body: {}", e);
        }
    }
    http_request
}

/// Joins repeated headers with `; `, which is how multiple `Cookie` headers
/// combine.
fn header_value(headers: &[Header], name: &str) -> Option<String> {
    let values = headers
        .iter()
        .filter(|header| header.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
        .collect::<Vec<_>>();
    (!values.is_empty()).then(|| values.join("; "))
}

fn build_response(reply: Reply) -> Response<std::io::Cursor<Vec<u8>>> {
    let status = reply.status();
    let mut headers = Vec::new();
    let body = match reply {
        Reply::Page { html, etag } => {
            headers.push(("Content-Type", "text/html; charset=utf-8".to_string()));
            headers.push(("Cache-Control", "no-cache".to_string()));
            headers.push(("Vary", "Cookie".to_string()));
            headers.push(("ETag", etag));
            html
        }
        Reply::NotModified { etag } => {
            headers.push(("ETag", etag));
            String::new()
        }
        Reply::Redirect {
            location,
            set_cookie,
        } => {
            headers.push(("Location", location.to_string()));
            if let Some(cookie) = set_cookie {
                headers.push(("Set-Cookie", cookie));
            }
            String::new()
        }
        Reply::NotFound => plain_text(&mut headers, "Not Found"),
        Reply::MethodNotAllowed => {
            headers.push(("Allow", "GET, HEAD, POST".to_string()));
            plain_text(&mut headers, "Method Not Allowed")
        }
        Reply::PayloadTooLarge => plain_text(&mut headers, "Payload Too Large"),
    };

    headers
        .into_iter()
        .fold(
            Response::from_data(body.into_bytes()).with_status_code(status),
            |response, (name, value)| match Header::from_bytes(name, value.as_bytes()) {
                Ok(header) => response.with_header(header),
                Err(()) => {
                    warn!("Dropping invalid '{}' header", name);
                    response
                }
            },
        )
}

fn plain_text(headers: &mut Vec<(&'static str, String)>, text: &str) -> String {
    headers.push(("Content-Type", "text/plain; charset=utf-8".to_string()));
    text.to_string()
}

#[derive(Debug, Snafu)]
pub enum ServerError {
    #[snafu(display("Failed to listen on {}: {}", address, message))]
    BindError { address: String, message: String },
    #[snafu(display("Failed to start the accept thread"))]
    AcceptThreadError { source: std::io::Error },
}
