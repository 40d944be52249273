use crate::core::errors::ModemError;
use crate::core::kernel::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<HttpResponse, ModemError>>,
    requests: Vec<HttpRequest>,
    opens: usize,
    closes: usize,
}

/// In-memory transport that replays queued responses in order
///
/// Every sent request is recorded. Clones share the same script, so a test can
/// keep a handle after moving the transport into a `Modem`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    open: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // a panicking test thread must not hide the script from the others
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Queue a response
    pub fn push_response(&self, response: HttpResponse) -> &Self {
        self.script().responses.push_back(Ok(response));
        self
    }

    /// Queue a `200 OK` response with an XML body
    pub fn push_xml(&self, body: &str) -> &Self {
        self.push_response(HttpResponse::new(200, body))
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: ModemError) -> &Self {
        self.script().responses.push_back(Err(error));
        self
    }

    /// Requests sent so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.script().requests.last().cloned()
    }

    pub fn remaining_responses(&self) -> usize {
        self.script().responses.len()
    }

    pub fn open_count(&self) -> usize {
        self.script().opens
    }

    pub fn close_count(&self) -> usize {
        self.script().closes
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn open(&mut self) -> Result<(), ModemError> {
        self.script().opens += 1;
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.script().closes += 1;
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ModemError> {
        if !self.open {
            return Err(ModemError::NotConnected);
        }

        let mut script = self.script();
        script.requests.push(request.clone());
        script.responses.pop_front().unwrap_or_else(|| {
            Err(ModemError::Transport("no scripted responses remaining".to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HttpMethod;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: "/api/webserver/SesTokInfo".to_string(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_replays_in_order() {
        let mut transport = ScriptedTransport::new();
        transport.push_xml("<a/>").push_xml("<b/>");
        transport.open().unwrap();

        let first = transport.send(&request()).await.unwrap();
        let second = transport.send(&request()).await.unwrap();
        assert_eq!(first.text(), "<a/>");
        assert_eq!(second.text(), "<b/>");
        assert!(matches!(
            transport.send(&request()).await,
            Err(ModemError::Transport(_))
        ));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let handle = ScriptedTransport::new();
        let mut transport = handle.clone();
        handle.push_xml("<a/>");

        transport.open().unwrap();
        transport.send(&request()).await.unwrap();

        assert_eq!(handle.remaining_responses(), 0);
        assert_eq!(handle.open_count(), 1);
        assert_eq!(
            handle.last_request().map(|r| r.path),
            Some("/api/webserver/SesTokInfo".to_string())
        );
    }
}
