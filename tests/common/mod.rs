// Shared fixtures for integration tests: scripted translators and
// subscribers that record, fail or stall.

#![allow(dead_code)]

use anyhow::{bail, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use translation_hub::config::HubConfig;
use translation_hub::fanout::Frame;
use translation_hub::{DeliveryError, Hub, Subscriber, Translator};

// ============================================================================
// Translators
// ============================================================================

/// Translator whose behaviour is scripted per test
#[derive(Default)]
pub struct ScriptedTranslator {
    prompts: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    failures_remaining: AtomicUsize,
    gate: Option<Semaphore>,
    delay: Option<Duration>,
}

impl ScriptedTranslator {
    /// Answers immediately
    pub fn instant() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Each call waits for a permit handed out by `release`
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Semaphore::new(0)),
            ..Default::default()
        })
    }

    /// Each call sleeps before answering
    pub fn delayed(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Default::default()
        })
    }

    /// The first `failures` calls return an error
    pub fn failing_first(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures_remaining: AtomicUsize::new(failures),
            ..Default::default()
        })
    }

    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(&self, prompt: &str) -> Result<String> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            bail!("translation service unavailable");
        }

        Ok(format!("translation #{}", call))
    }
}

// ============================================================================
// Subscribers
// ============================================================================

/// Keeps every frame it receives, parsed as JSON
#[derive(Default)]
pub struct RecordingSubscriber {
    frames: Mutex<Vec<Value>>,
}

impl RecordingSubscriber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn frames(&self) -> Vec<Value> {
        self.frames.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    /// Frames carrying a full session snapshot
    pub fn snapshots(&self) -> Vec<Value> {
        self.frames()
            .into_iter()
            .filter(|frame| frame["type"] == "translation_update")
            .collect()
    }
}

#[async_trait::async_trait]
impl Subscriber for RecordingSubscriber {
    async fn send(&self, frame: Frame) -> Result<(), DeliveryError> {
        let value: Value = serde_json::from_str(&frame.payload).expect("frames are valid JSON");
        self.frames.lock().unwrap().push(value);
        Ok(())
    }
}

/// Transport that is already closed
#[derive(Default)]
pub struct FailingSubscriber {
    pub attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl Subscriber for FailingSubscriber {
    async fn send(&self, _frame: Frame) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Closed)
    }
}

/// Transport that never finishes a write
pub struct StalledSubscriber;

#[async_trait::async_trait]
impl Subscriber for StalledSubscriber {
    async fn send(&self, _frame: Frame) -> Result<(), DeliveryError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub const SEND_TIMEOUT_MS: u64 = 100;

pub fn hub_config() -> HubConfig {
    HubConfig {
        send_timeout_ms: SEND_TIMEOUT_MS,
        ..Default::default()
    }
}

pub fn hub_with(translator: Arc<ScriptedTranslator>) -> Arc<Hub> {
    Hub::new(&hub_config(), translator, Duration::from_secs(5))
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_until<F>(condition: F)
where
    F: Fn() -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached within 2s");
}

/// Wait until no translation is running and the translated count is `count`
pub async fn wait_for_translated(hub: &Arc<Hub>, count: usize) {
    wait_until(|| !hub.translation_in_flight() && hub.status().translated_segment_count == count)
        .await;
}
