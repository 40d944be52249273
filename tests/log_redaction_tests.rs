use huamodem::core::kernel::HttpResponse;
use huamodem::modem::compute_login_hash;
use huamodem::{Modem, ScriptedTransport};
use std::io;
use std::sync::{Arc, Mutex};

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_trace_logs_never_contain_session_secrets() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let script = ScriptedTransport::new();
    script
        .push_xml(
            "<response><SesInfo>SessionID=SECRETSES</SesInfo><TokInfo>SECRETTOK</TokInfo></response>",
        )
        .push_response(
            HttpResponse::new(200, "<response>OK</response>")
                .with_header("Set-Cookie", "SessionID=SECRETSES2; path=/; HttpOnly")
                .with_header("__RequestVerificationTokenone", "SECRETTOK2"),
        )
        .push_xml("<response><rsrp>-95dBm</rsrp></response>");

    let mut modem = Modem::new(script);
    modem.connect().unwrap();
    modem.obtain_session_token().await.unwrap();
    modem.login("admin", "s3cret-pass").await.unwrap();
    modem.call_signal_parameters().await.unwrap();

    let output = logs.contents();

    // the subscriber did capture the response events
    assert!(output.contains("Device response"), "{}", output);
    assert!(output.contains("body_len"), "{}", output);

    let login_hash = compute_login_hash("admin", "s3cret-pass", "SECRETTOK");
    for secret in [
        "SECRETSES",
        "SECRETTOK",
        "s3cret-pass",
        login_hash.as_str(),
    ] {
        assert!(!output.contains(secret), "{} leaked into logs:\n{}", secret, output);
    }
}
