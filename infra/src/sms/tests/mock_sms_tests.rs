use std::io::Write;
use std::sync::{Arc, Mutex};

use pv_core::services::delivery::DeliveryChannel;

use crate::sms::MockSmsChannel;

#[tokio::test]
async fn test_mock_captures_messages() {
    let channel = MockSmsChannel::new();

    let first = channel.send_sms("9876543210", "code 111111").await.unwrap();
    let second = channel.send_sms("9123456780", "code 222222").await.unwrap();

    assert!(first.starts_with("mock-"));
    assert_ne!(first, second);

    let sent = channel.sent_messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].phone, "9876543210");
    assert_eq!(sent[1].body, "code 222222");
}

#[tokio::test]
async fn test_last_message_to_phone() {
    let channel = MockSmsChannel::new();
    channel.send_sms("9876543210", "first").await.unwrap();
    channel.send_sms("9123456780", "other").await.unwrap();
    channel.send_sms("9876543210", "second").await.unwrap();

    let last = channel.last_message_to("9876543210").unwrap();
    assert_eq!(last.body, "second");
    assert!(channel.last_message_to("9000000000").is_none());
}

#[test]
fn test_mock_provider_name() {
    assert_eq!(MockSmsChannel::new().provider_name(), "mock");
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_mock_logs_never_carry_message_body() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let channel = MockSmsChannel::new();
        tokio_test::block_on(channel.send_sms("9876543210", "Your code is 482913")).unwrap();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("Mock SMS captured"));
    assert!(!output.contains("482913"));
    assert!(!output.contains("9876543210"));
}
