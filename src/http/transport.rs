use super::{ApiError, HttpRequest, HttpResponse, Transport};

/// Blocking transport backed by `ureq`.
///
/// Error statuses are returned as ordinary responses so the client can
/// apply its status policy; only connection-level failures become `Err`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        // On Windows, "localhost" may try IPv6 (::1) first and stall when the
        // backend only binds IPv4.
        let url = request.url.replace("://localhost", "://127.0.0.1");

        let mut req = ureq::request(request.method.as_str(), &url).timeout(request.timeout);
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        let result = match &request.body {
            Some(body) => req.send_string(body),
            None => req.call(),
        };

        match result {
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .into_string()
                    .map_err(|e| ApiError::Transport(format!("failed to read response: {e}")))?;
                Ok(HttpResponse { status, body })
            }
            Err(ureq::Error::Status(status, resp)) => Ok(HttpResponse {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(t)) => Err(ApiError::Transport(t.to_string())),
        }
    }
}
