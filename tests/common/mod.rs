//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use tennis_ladder::{EmailMessage, League, Notifier, NotifyError, PlayerRanking};

pub const EPS: f64 = 1e-9;

pub fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn match_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

/// League with the given (name, points) standings, in that order.
pub fn league_with_points(players: &[(&str, f64)]) -> League {
    League {
        rankings: players
            .iter()
            .map(|(name, points)| PlayerRanking {
                points: *points,
                ..PlayerRanking::new(*name)
            })
            .collect(),
        ..League::default()
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

/// Notifier that keeps every message it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Notifier whose transport is always down.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp connection refused".to_string()))
    }
}
