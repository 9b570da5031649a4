//! Background forecast fetching
//!
//! Runs each forecast fetch as a tokio task and reports the reshaped result
//! back to the main application over a channel. Every fetch carries a request
//! id; starting a new fetch aborts the one still in flight.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::data::{Forecast, ForecastLocation, WeatherClient, WeatherError};
use crate::reshape::{location_now, reshape_forecast};

/// Messages sent from a fetch task to the main app
#[derive(Debug)]
pub enum FetchMessage {
    /// A fetch finished, successfully or not
    Completed {
        request_id: u64,
        location: ForecastLocation,
        result: Result<Forecast, WeatherError>,
    },
}

/// Owns the in-flight fetch task and the channel its result arrives on
pub struct ForecastFetcher {
    client: WeatherClient,
    sender: mpsc::Sender<FetchMessage>,
    receiver: mpsc::Receiver<FetchMessage>,
    in_flight: Option<JoinHandle<()>>,
    last_request_id: u64,
}

impl ForecastFetcher {
    pub fn new(client: WeatherClient) -> Self {
        let (sender, receiver) = mpsc::channel(8);
        Self {
            client,
            sender,
            receiver,
            in_flight: None,
            last_request_id: 0,
        }
    }

    /// Starts fetching the forecast for `location` and returns the request id
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, location: ForecastLocation) -> u64 {
        if let Some(task) = self.in_flight.take() {
            if !task.is_finished() {
                tracing::debug!(request_id = self.last_request_id, "Cancelling in-flight fetch");
            }
            task.abort();
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        let client = self.client.clone();
        let sender = self.sender.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let result = client.fetch_forecast(&location).await.map(|series| {
                let now = location_now(series.utc_offset_seconds);
                reshape_forecast(&series, now)
            });
            if let Err(e) = &result {
                tracing::error!(request_id, error = %e, "Forecast fetch failed");
            }
            let _ = sender
                .send(FetchMessage::Completed {
                    request_id,
                    location,
                    result,
                })
                .await;
        }));

        request_id
    }

    /// Checks for a finished fetch without blocking
    pub fn try_recv(&mut self) -> Option<FetchMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished fetch
    pub async fn recv(&mut self) -> Option<FetchMessage> {
        self.receiver.recv().await
    }

    pub fn last_request_id(&self) -> u64 {
        self.last_request_id
    }
}

impl Drop for ForecastFetcher {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
