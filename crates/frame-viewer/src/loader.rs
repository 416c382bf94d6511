//! Background fetching of per-frame scene data.
//!
//! Fetches run on a dedicated worker thread so the render loop never waits
//! on the network. Each request is tagged with a sequence number and only
//! the response to the newest request is ever applied; answers to
//! superseded requests are dropped when they arrive.

use crossbeam_channel::{Receiver, Sender};
use scene_frame::{FrameError, SceneData};
use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Placeholder substituted with the zero-padded frame index.
pub const FRAME_PLACEHOLDER: &str = "{frame}";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Decode(#[from] FrameError),
}

/// Expands `template` for one frame. Indices are padded to at least two
/// digits; wider indices keep all their digits.
pub fn frame_url(template: &str, frame: u32) -> String {
    template.replace(FRAME_PLACEHOLDER, &format!("{frame:02}"))
}

/// Anything that can produce the raw body of a frame.
pub trait FrameSource: Send + 'static {
    fn fetch(&self, frame: u32) -> Result<Vec<u8>, FetchError>;
}

impl<F> FrameSource for F
where
    F: Fn(u32) -> Result<Vec<u8>, FetchError> + Send + 'static,
{
    fn fetch(&self, frame: u32) -> Result<Vec<u8>, FetchError> {
        self(frame)
    }
}

/// Fetches frames over HTTP(S). No retries, no timeout.
pub struct HttpFrameSource {
    template: String,
    agent: ureq::Agent,
}

impl HttpFrameSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl FrameSource for HttpFrameSource {
    fn fetch(&self, frame: u32) -> Result<Vec<u8>, FetchError> {
        let url = frame_url(&self.template, frame);
        log::debug!("GET {url}");

        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        })?;

        let mut body = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body)
    }
}

/// What the scene shows right now. Data and error are mutually exclusive;
/// `Loading` means neither has arrived yet.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(Arc<SceneData>),
    Failed(String),
}

impl LoadState {
    pub fn scene(&self) -> Option<&Arc<SceneData>> {
        match self {
            LoadState::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

struct FrameRequest {
    seq: u64,
    frame: u32,
}

struct FrameResponse {
    seq: u64,
    frame: u32,
    result: Result<SceneData, FetchError>,
}

pub struct FrameLoader {
    requests: Sender<FrameRequest>,
    responses: Receiver<FrameResponse>,
    latest_seq: u64,
    latest_frame: Option<u32>,
    loaded_frame: Option<u32>,
    in_flight: bool,
    state: LoadState,
}

impl FrameLoader {
    /// Starts the fetch worker for `source`.
    pub fn spawn<S: FrameSource>(source: S) -> Self {
        let (req_tx, req_rx) = crossbeam_channel::unbounded::<FrameRequest>();
        let (resp_tx, resp_rx) = crossbeam_channel::unbounded::<FrameResponse>();

        thread::Builder::new()
            .name("frame-fetch".into())
            .spawn(move || run_worker(source, req_rx, resp_tx))
            .map(|_| ())
            .unwrap_or_else(|e| log::error!("Failed to start fetch worker: {e}"));

        Self {
            requests: req_tx,
            responses: resp_rx,
            latest_seq: 0,
            latest_frame: None,
            loaded_frame: None,
            in_flight: false,
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Frame whose data (or error) is currently shown.
    pub fn loaded_frame(&self) -> Option<u32> {
        self.loaded_frame
    }

    /// Most recently requested frame.
    pub fn requested_frame(&self) -> Option<u32> {
        self.latest_frame
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Asks for `frame`. Repeating the latest request is a no-op; the
    /// current snapshot stays visible until the answer arrives.
    pub fn request(&mut self, frame: u32) -> bool {
        if self.latest_frame == Some(frame) {
            return false;
        }
        self.latest_seq += 1;
        self.latest_frame = Some(frame);
        self.in_flight = true;

        let req = FrameRequest {
            seq: self.latest_seq,
            frame,
        };
        if self.requests.send(req).is_err() {
            self.fail(frame, "frame fetch worker is not running".to_owned());
        }
        true
    }

    /// Applies any responses that arrived. Returns `true` if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(resp) = self.responses.try_recv() {
            changed |= self.apply(resp);
        }
        changed
    }

    /// Like [`FrameLoader::poll`], but waits up to `timeout` for a response
    /// to the latest request.
    pub fn poll_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        while self.in_flight {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(resp) => {
                    if self.apply(resp) {
                        return true;
                    }
                }
                Err(_) => return false,
            }
        }
        self.poll()
    }

    fn apply(&mut self, resp: FrameResponse) -> bool {
        if resp.seq != self.latest_seq {
            log::debug!(
                "Dropped stale response for frame {} (seq {} < {})",
                resp.frame,
                resp.seq,
                self.latest_seq
            );
            return false;
        }
        self.in_flight = false;

        match resp.result {
            Ok(scene) => {
                log::info!(
                    "Frame {:02}: {} points, {} cuboids",
                    resp.frame,
                    scene.points.len(),
                    scene.cuboids.len()
                );
                self.loaded_frame = Some(resp.frame);
                self.state = LoadState::Ready(Arc::new(scene));
            }
            Err(e) => self.fail(resp.frame, e.to_string()),
        }
        true
    }

    fn fail(&mut self, frame: u32, msg: String) {
        log::error!("Error fetching frame {frame:02}: {msg}");
        self.in_flight = false;
        self.loaded_frame = Some(frame);
        self.state = LoadState::Failed(msg);
    }
}

fn run_worker<S: FrameSource>(
    source: S,
    requests: Receiver<FrameRequest>,
    responses: Sender<FrameResponse>,
) {
    while let Ok(mut req) = requests.recv() {
        // Anything still queued behind this request supersedes it.
        while let Ok(newer) = requests.try_recv() {
            log::debug!("Skipping fetch of frame {} (superseded)", req.frame);
            req = newer;
        }

        let result = source
            .fetch(req.frame)
            .and_then(|body| SceneData::from_json_slice(&body).map_err(FetchError::from));

        let resp = FrameResponse {
            seq: req.seq,
            frame: req.frame,
            result,
        };
        if responses.send(resp).is_err() {
            break;
        }
    }
    log::debug!("Frame fetch worker exiting");
}
