//! Background fetch runner
//!
//! Requests run on a small tokio runtime; finished outcomes come back over a
//! channel and are drained on the UI thread once per tick. Every request gets
//! a sequence number so views can drop outcomes they no longer care about.

use crate::model::{FetchRequest, FetchResponse, ViewId};
use crate::services::api::ApiClient;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

/// A finished request, addressed to the view that issued it
#[derive(Debug)]
pub struct FetchOutcome {
    pub view: ViewId,
    pub seq: u64,
    pub request: FetchRequest,
    pub elapsed: Duration,
    pub result: Result<FetchResponse, String>,
}

pub struct FetchRunner {
    runtime: Runtime,
    client: Arc<ApiClient>,
    sender: Sender<FetchOutcome>,
    receiver: Receiver<FetchOutcome>,
    next_seq: u64,
    in_flight: usize,
}

impl FetchRunner {
    pub fn new(client: ApiClient) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("gw-dash-fetch")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::channel();

        Ok(Self {
            runtime,
            client: Arc::new(client),
            sender,
            receiver,
            next_seq: 1,
            in_flight: 0,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Number of requests spawned but not yet drained by `poll`
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start `request` for `view` and return its sequence number
    pub fn spawn(&mut self, view: ViewId, request: FetchRequest) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;

        tracing::debug!(%view, seq, %request, "fetch started");

        let client = Arc::clone(&self.client);
        let tx = self.sender.clone();
        self.runtime.spawn(async move {
            let started = Instant::now();
            let result = client
                .execute(&request)
                .await
                .map_err(|e| e.to_string());
            // Receiver gone means the app is shutting down
            let _ = tx.send(FetchOutcome {
                view,
                seq,
                request,
                elapsed: started.elapsed(),
                result,
            });
        });

        seq
    }

    /// Drain every finished outcome without blocking
    pub fn poll(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    outcomes.push(outcome);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn unreachable_runner() -> FetchRunner {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            request_timeout_secs: 2,
            ..Config::default()
        };
        FetchRunner::new(ApiClient::new(&config).unwrap()).unwrap()
    }

    fn poll_until(runner: &mut FetchRunner, count: usize) -> Vec<FetchOutcome> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut outcomes = Vec::new();
        while outcomes.len() < count && Instant::now() < deadline {
            outcomes.extend(runner.poll());
            std::thread::sleep(Duration::from_millis(20));
        }
        outcomes
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut runner = unreachable_runner();
        let a = runner.spawn(ViewId::Population, FetchRequest::Page(ViewId::Population));
        let b = runner.spawn(ViewId::Elevation, FetchRequest::ElevationOverview);
        assert!(b > a);
        assert_eq!(runner.in_flight(), 2);
    }

    #[test]
    fn test_failed_requests_come_back_addressed() {
        let mut runner = unreachable_runner();
        let seq = runner.spawn(ViewId::Hydrogeology, FetchRequest::Page(ViewId::Hydrogeology));

        let outcomes = poll_until(&mut runner, 1);
        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];
        assert_eq!(outcome.view, ViewId::Hydrogeology);
        assert_eq!(outcome.seq, seq);
        assert_eq!(outcome.request, FetchRequest::Page(ViewId::Hydrogeology));
        assert!(outcome.result.is_err());
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_poll_without_requests_is_empty() {
        let mut runner = unreachable_runner();
        assert!(runner.poll().is_empty());
    }
}
