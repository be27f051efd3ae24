//! Unit tests for SMS channels

mod mock_sms_tests;
