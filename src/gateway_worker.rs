use crate::gateway::LectureGateway;
use crate::models::{GatewayCall, GatewayRequest, GatewayResponse};
use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use std::io;
use std::sync::Arc;
use std::thread;

async fn execute(gateway: &dyn LectureGateway, request: GatewayRequest) -> GatewayResponse {
    let ticket = request.ticket;
    match request.call {
        GatewayCall::FetchLecture { id } => GatewayResponse::Lecture {
            ticket,
            result: gateway.fetch_lecture(&id).await,
        },
        GatewayCall::DeleteLecture { id } => {
            let result = gateway.delete_lecture(&id).await;
            GatewayResponse::Deleted { ticket, id, result }
        }
        GatewayCall::ListLectures { filter } => GatewayResponse::Listing {
            ticket,
            listing: gateway.list_lectures(&filter).await,
        },
        GatewayCall::Upload { request } => GatewayResponse::Uploaded {
            ticket,
            result: gateway.upload_lecture(&request).await,
        },
        GatewayCall::RegenerateFlashcards { id } => {
            let result = gateway.regenerate_flashcards(&id).await;
            GatewayResponse::Flashcards { ticket, id, result }
        }
        GatewayCall::RegenerateQuiz { id } => {
            let result = gateway.regenerate_quiz(&id).await;
            GatewayResponse::Quiz { ticket, id, result }
        }
    }
}

/// Run gateway calls on a dedicated thread so the draw loop never blocks on I/O.
/// The worker exits when the request channel is closed.
pub fn spawn_gateway_worker(
    gateway: Arc<dyn LectureGateway>,
    responses: Sender<GatewayResponse>,
    requests: Receiver<GatewayRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("lecture-study::gateway_worker".to_string())
        .spawn(move || {
            while let Ok(request) = requests.recv() {
                log::debug!("worker received request #{}", request.ticket);
                let response = runtime.block_on(execute(gateway.as_ref(), request));
                if responses.send(response).is_err() {
                    break;
                }
            }
            log::debug!("gateway worker channel disconnected, exiting");
        })
}

/// UI-side end of the worker: hands out tickets and collects responses.
pub struct GatewayHandle {
    requests: Sender<GatewayRequest>,
    responses: Receiver<GatewayResponse>,
    next_ticket: u64,
    _worker: thread::JoinHandle<()>,
}

impl GatewayHandle {
    pub fn spawn(gateway: Arc<dyn LectureGateway>) -> io::Result<Self> {
        let (request_tx, request_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();
        let worker = spawn_gateway_worker(gateway, response_tx, request_rx)?;
        Ok(Self {
            requests: request_tx,
            responses: response_rx,
            next_ticket: 1,
            _worker: worker,
        })
    }

    /// Queue a call and return its ticket. `None` if the worker is gone.
    pub fn submit(&mut self, call: GatewayCall) -> Option<u64> {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.requests
            .send(GatewayRequest { ticket, call })
            .ok()
            .map(|_| ticket)
    }

    pub fn try_recv(&self) -> Option<GatewayResponse> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("gateway worker stopped");
                None
            }
        }
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<GatewayResponse> {
        self.responses.recv_timeout(timeout).ok()
    }
}
