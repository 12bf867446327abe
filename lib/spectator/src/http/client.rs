/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use flate2::Compression;
use flate2::write::GzEncoder;
use http::StatusCode;
use log::{debug, warn};
use url::{Position, Url};

use super::{HttpError, TRANSPORT_FAILURE, Transport};
use crate::SpectatorConfig;

const MAX_STATUS_LINE_SIZE: u64 = 4096;

/// Blocking HTTP/1.1 client, one connection per request.
pub struct HttpClient {
    connect_timeout: Duration,
    read_timeout: Duration,
    compress: bool,

    create_instant: Instant,
    last_error_report: AtomicU64,
}

impl HttpClient {
    pub fn new(config: &SpectatorConfig) -> Self {
        HttpClient {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            compress: config.compress(),
            create_instant: Instant::now(),
            last_error_report: AtomicU64::new(u64::MAX),
        }
    }

    /// Post a json body and return the response status.
    pub fn post(&self, uri: &Url, body: &[u8]) -> Result<StatusCode, HttpError> {
        if uri.scheme() != "http" {
            return Err(HttpError::UnsupportedScheme(uri.scheme().to_string()));
        }
        let host = uri.host_str().ok_or(HttpError::NoHost)?;
        let host_header = match uri.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let body = if self.compress {
            Cow::Owned(gzip(body).map_err(HttpError::CompressFailed)?)
        } else {
            Cow::Borrowed(body)
        };

        let mut header = format!(
            "POST {} HTTP/1.1\r\n\
             Host: {host_header}\r\n\
             User-Agent: spectator-rs/{}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n",
            &uri[Position::BeforePath..Position::AfterQuery],
            env!("CARGO_PKG_VERSION"),
            body.len(),
        );
        if self.compress {
            header.push_str("Content-Encoding: gzip\r\n");
        }
        header.push_str("\r\n");

        let mut stream = self.connect(uri, &host_header)?;
        write_request(&mut stream, header.as_bytes(), &body).map_err(HttpError::WriteFailed)?;
        read_status(stream)
    }

    fn connect(&self, uri: &Url, host: &str) -> Result<TcpStream, HttpError> {
        let addrs = uri
            .socket_addrs(|| Some(80))
            .map_err(|e| HttpError::ResolveFailed(host.to_string(), e))?;

        let mut last_err: Option<io::Error> = None;
        for addr in addrs {
            match self.connect_addr(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        match last_err {
            Some(e) => Err(HttpError::ConnectFailed(host.to_string(), e)),
            None => Err(HttpError::NoAddress(host.to_string())),
        }
    }

    fn connect_addr(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let stream = TcpStream::connect_timeout(&addr, self.connect_timeout)?;
        stream.set_read_timeout(Some(self.read_timeout))?;
        stream.set_write_timeout(Some(self.read_timeout))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn handle_post_error(&self, uri: &Url, e: HttpError) {
        let time_slice = self.create_instant.elapsed().as_secs() >> 6; // every 64s
        if self.last_error_report.swap(time_slice, Ordering::Relaxed) != time_slice {
            warn!("failed to post metrics to {uri}: {e}");
        } else {
            debug!("failed to post metrics to {uri}: {e}");
        }
    }
}

impl Transport for HttpClient {
    fn post_batches(&self, uri: &Url, batches: &[Vec<u8>]) -> Vec<i32> {
        batches
            .iter()
            .map(|batch| match self.post(uri, batch) {
                Ok(code) => {
                    debug!("posted {} bytes to {uri}: {code}", batch.len());
                    i32::from(code.as_u16())
                }
                Err(e) => {
                    self.handle_post_error(uri, e);
                    TRANSPORT_FAILURE
                }
            })
            .collect()
    }
}

fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 4), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn write_request(stream: &mut TcpStream, header: &[u8], body: &[u8]) -> io::Result<()> {
    stream.write_all(header)?;
    stream.write_all(body)?;
    stream.flush()
}

fn read_status(stream: TcpStream) -> Result<StatusCode, HttpError> {
    let mut reader = BufReader::new(stream.take(MAX_STATUS_LINE_SIZE));
    let mut line = String::new();
    let len = reader
        .read_line(&mut line)
        .map_err(HttpError::ReadFailed)?;
    if len == 0 {
        return Err(HttpError::InvalidResponse("connection closed without response"));
    }
    if !line.ends_with('\n') {
        return Err(HttpError::InvalidResponse("status line too long"));
    }

    let mut parts = line.trim_end().splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::InvalidResponse("unsupported http version"));
    }
    let code = parts
        .next()
        .ok_or(HttpError::InvalidResponse("no status code"))?;
    StatusCode::from_bytes(code.as_bytes())
        .map_err(|_| HttpError::InvalidResponse("invalid status code"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    struct Request {
        head: Vec<String>,
        body: Vec<u8>,
    }

    impl Request {
        fn header(&self, name: &str) -> Option<&str> {
            self.head.iter().skip(1).find_map(|line| {
                let (k, v) = line.split_once(':')?;
                k.eq_ignore_ascii_case(name).then(|| v.trim())
            })
        }
    }

    fn serve_once(response: &'static str) -> (Url, JoinHandle<Request>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let uri = Url::parse(&format!("http://{addr}/api/v4/publish?src=test")).unwrap();

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                head.push(line);
            }
            let mut req = Request {
                head,
                body: Vec::new(),
            };
            let len: usize = req.header("Content-Length").unwrap().parse().unwrap();
            req.body.resize(len, 0);
            reader.read_exact(&mut req.body).unwrap();

            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            req
        });
        (uri, handle)
    }

    #[test]
    fn post_plain() {
        let (uri, server) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
        let client = HttpClient::new(&SpectatorConfig::default().with_compress(false));

        let code = client.post(&uri, b"[1,\"a\"]").unwrap();
        assert_eq!(code, StatusCode::OK);

        let req = server.join().unwrap();
        assert_eq!(req.head[0], "POST /api/v4/publish?src=test HTTP/1.1");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("Content-Encoding"), None);
        assert_eq!(req.body, b"[1,\"a\"]");
    }

    #[test]
    fn post_gzip() {
        let (uri, server) =
            serve_once("HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\n\r\n");
        let client = HttpClient::new(&SpectatorConfig::default());

        let codes = client.post_batches(&uri, &[b"[0]".to_vec()]);
        assert_eq!(codes, vec![503]);

        let req = server.join().unwrap();
        assert_eq!(req.header("Content-Encoding"), Some("gzip"));
        let mut body = String::new();
        GzDecoder::new(req.body.as_slice())
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "[0]");
    }

    #[test]
    fn connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let uri = Url::parse(&format!("http://{addr}/")).unwrap();
        let client = HttpClient::new(&SpectatorConfig::default());
        let codes = client.post_batches(&uri, &[b"[]".to_vec(), b"[]".to_vec()]);
        assert_eq!(codes, vec![TRANSPORT_FAILURE, TRANSPORT_FAILURE]);
    }

    #[test]
    fn invalid_response() {
        let (uri, server) = serve_once("SSH-2.0-OpenSSH\r\n");
        let client = HttpClient::new(&SpectatorConfig::default().with_compress(false));
        let r = client.post(&uri, b"[]");
        assert!(matches!(r, Err(HttpError::InvalidResponse(_))));
        server.join().unwrap();
    }

    #[test]
    fn unsupported_scheme() {
        let uri = Url::parse("https://localhost/api").unwrap();
        let client = HttpClient::new(&SpectatorConfig::default());
        let r = client.post(&uri, b"[]");
        assert!(matches!(r, Err(HttpError::UnsupportedScheme(s)) if s == "https"));
    }
}
