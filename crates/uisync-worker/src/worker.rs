//! The parse/print worker.
//!
//! [`ParsePrintWorker`] does the work: every file of a request runs on the
//! blocking pool, at most [`WorkerConfig::max_concurrent_files`] at a time.
//! [`WorkerHandle`] puts a worker behind a channel so callers only ever see
//! request/response pairs.

use crate::error::{WorkerError, WorkerResult};
use crate::messages::{
    MessageId, ParseFileResult, ParseOrPrint, ParseOrPrintResult, ParsePrintFilesRequest,
    ParsePrintResultMessage, PrintCodeResult, decode, encode,
};
use log::{debug, trace, warn};
use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Semaphore, mpsc, oneshot};
use uisync_core::model::ParsedTextFile;
use uisync_core::parser::parse_code;
use uisync_core::printer::{PrintOptions, PrintableFile, print_code};
use uisync_core::uid::Uid;

/// Worker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Files processed at the same time. Default: the available parallelism.
    pub max_concurrent_files: usize,
    /// Requests queued on a [`WorkerHandle`] before senders wait. Default: **32**.
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: std::thread::available_parallelism()
                .map_or(4, NonZeroUsize::get),
            queue_capacity: 32,
        }
    }
}

pub struct ParsePrintWorker {
    config: WorkerConfig,
    next_id: AtomicU64,
    permits: Arc<Semaphore>,
}

impl Default for ParsePrintWorker {
    fn default() -> Self {
        Self::new(WorkerConfig::default())
    }
}

impl ParsePrintWorker {
    pub fn new(config: WorkerConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_files.max(1)));
        Self {
            config,
            next_id: AtomicU64::new(0),
            permits,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// A fresh ID, unique for this worker.
    pub fn next_message_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap `files` in a request with a fresh ID.
    pub fn request(
        &self,
        files: Vec<ParseOrPrint>,
        already_existing_uids: HashSet<Uid>,
    ) -> ParsePrintFilesRequest {
        ParsePrintFilesRequest {
            message_id: self.next_message_id(),
            files,
            already_existing_uids,
        }
    }

    /// Process every file of `request` concurrently. Results come back in
    /// request order.
    ///
    /// # Errors
    /// [`WorkerError::Join`] if processing a file panicked.
    pub async fn process(
        &self,
        request: ParsePrintFilesRequest,
    ) -> WorkerResult<Vec<ParseOrPrintResult>> {
        let ParsePrintFilesRequest {
            message_id,
            files,
            already_existing_uids,
        } = request;
        debug!("request {message_id}: {} files", files.len());
        let existing = Arc::new(already_existing_uids);
        let mut tasks = Vec::with_capacity(files.len());
        for file in files {
            let permit = Arc::clone(&self.permits)
                .acquire_owned()
                .await
                .map_err(|_| WorkerError::WorkerGone)?;
            let existing = Arc::clone(&existing);
            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                process_file(file, &existing)
            }));
        }
        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await?);
        }
        Ok(results)
    }

    /// Answer `request`; a failure becomes a [`ParsePrintResultMessage::Failed`].
    pub async fn handle(&self, request: ParsePrintFilesRequest) -> ParsePrintResultMessage {
        let message_id = request.message_id;
        match self.process(request).await {
            Ok(files) => ParsePrintResultMessage::FilesResult { message_id, files },
            Err(e) => {
                warn!("request {message_id} failed: {e}");
                ParsePrintResultMessage::Failed { message_id }
            }
        }
    }

    /// [`Self::handle`] for a request arriving as MessagePack bytes.
    ///
    /// # Errors
    /// The request does not decode, or the response does not encode.
    pub async fn handle_encoded(&self, request: &[u8]) -> WorkerResult<Vec<u8>> {
        let request: ParsePrintFilesRequest = decode(request)?;
        encode(&self.handle(request).await)
    }
}

/// Parse or print one file.
fn process_file(file: ParseOrPrint, existing: &HashSet<Uid>) -> ParseOrPrintResult {
    match file {
        ParseOrPrint::ParseFile(parse) => {
            let parse_result = parse_code(
                &parse.file_name,
                &parse.content,
                parse.previous_parsed.as_ref(),
                existing,
            );
            if let ParsedTextFile::Failure(errors) = &parse_result {
                warn!("{} does not parse: {} errors", parse.file_name, errors.len());
            }
            ParseOrPrintResult::ParseFile(ParseFileResult {
                file_name: parse.file_name,
                parse_result,
                last_revised_time: parse.last_revised_time,
            })
        }
        ParseOrPrint::PrintCode(print) => {
            let options = PrintOptions {
                strip_uids: print.strip_uids,
                ..PrintOptions::default()
            };
            let print_result = print_code(&PrintableFile::from(&print.parse_success), &options);
            let highlight_bounds = match parse_code(
                &print.file_name,
                &print_result,
                Some(&print.parse_success),
                existing,
            ) {
                ParsedTextFile::Success(reparsed) => reparsed.highlight_bounds,
                _ => {
                    warn!("printed {} does not parse back", print.file_name);
                    BTreeMap::new()
                }
            };
            trace!("printed {} ({} bytes)", print.file_name, print_result.len());
            ParseOrPrintResult::PrintCode(PrintCodeResult {
                file_name: print.file_name,
                print_result,
                highlight_bounds,
                last_revised_time: print.last_revised_time,
            })
        }
    }
}

// ─── Channel front ───────────────────────────────────────────────────────

struct Job {
    request: ParsePrintFilesRequest,
    reply: oneshot::Sender<ParsePrintResultMessage>,
}

/// A worker running on its own task, reached through a channel.
///
/// Cloning the handle shares the worker. The worker stops once every handle
/// is dropped.
#[derive(Clone)]
pub struct WorkerHandle {
    worker: Arc<ParsePrintWorker>,
    sender: mpsc::Sender<Job>,
}

impl WorkerHandle {
    /// Start a worker on the current tokio runtime.
    pub fn spawn(config: WorkerConfig) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Job>(config.queue_capacity.max(1));
        let worker = Arc::new(ParsePrintWorker::new(config));
        let serving = Arc::clone(&worker);
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let worker = Arc::clone(&serving);
                tokio::spawn(async move {
                    let message_id = job.request.message_id;
                    let response = worker.handle(job.request).await;
                    if job.reply.send(response).is_err() {
                        trace!("request {message_id} abandoned by its caller");
                    }
                });
            }
            debug!("parse/print worker stopped");
        });
        Self { worker, sender }
    }

    /// Parse and print `files`, avoiding `already_existing_uids` for new UIDs.
    ///
    /// # Errors
    /// [`WorkerError::WorkerGone`] if the worker stopped,
    /// [`WorkerError::RequestFailed`] if it could not process the request.
    pub async fn parse_print(
        &self,
        files: Vec<ParseOrPrint>,
        already_existing_uids: HashSet<Uid>,
    ) -> WorkerResult<Vec<ParseOrPrintResult>> {
        let request = self.worker.request(files, already_existing_uids);
        let expected = request.message_id;
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Job { request, reply })
            .await
            .map_err(|_| WorkerError::WorkerGone)?;
        match response.await.map_err(|_| WorkerError::WorkerGone)? {
            ParsePrintResultMessage::FilesResult { message_id, files } if message_id == expected => {
                Ok(files)
            }
            ParsePrintResultMessage::FilesResult { message_id, .. } => {
                Err(WorkerError::MismatchedResponse {
                    expected,
                    received: message_id,
                })
            }
            ParsePrintResultMessage::Failed { message_id } => {
                Err(WorkerError::RequestFailed(message_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{ParseFile, PrintCode};
    use pretty_assertions::assert_eq;

    fn parse(file_name: &str, content: &str) -> ParseOrPrint {
        ParseOrPrint::ParseFile(ParseFile {
            file_name: file_name.to_string(),
            content: content.to_string(),
            previous_parsed: None,
            last_revised_time: 1,
        })
    }

    #[test]
    fn message_ids_are_per_worker() {
        let a = ParsePrintWorker::default();
        let b = ParsePrintWorker::default();
        assert_eq!(a.next_message_id(), MessageId(0));
        assert_eq!(a.next_message_id(), MessageId(1));
        assert_eq!(b.next_message_id(), MessageId(0));
    }

    #[test]
    fn zero_concurrency_still_makes_progress() {
        let worker = ParsePrintWorker::new(WorkerConfig {
            max_concurrent_files: 0,
            queue_capacity: 0,
        });
        assert_eq!(worker.permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn results_keep_request_order() {
        let worker = ParsePrintWorker::new(WorkerConfig {
            max_concurrent_files: 2,
            ..WorkerConfig::default()
        });
        let files = (0..5)
            .map(|i| parse(&format!("/f{i}.jsx"), "export const A = () => <div />\n"))
            .collect();
        let request = worker.request(files, HashSet::new());
        let results = worker.process(request).await.expect("processes");
        let names: Vec<&str> = results.iter().map(|r| r.file_name()).collect();
        assert_eq!(names, ["/f0.jsx", "/f1.jsx", "/f2.jsx", "/f3.jsx", "/f4.jsx"]);
    }

    #[tokio::test]
    async fn print_reports_highlight_bounds() {
        let success = parse_code(
            "/app.jsx",
            "export const App = () => <div data-uid=\"root\" />\n",
            None,
            &HashSet::new(),
        )
        .into_success()
        .expect("parses");
        let worker = ParsePrintWorker::default();
        let request = worker.request(
            vec![ParseOrPrint::PrintCode(PrintCode {
                file_name: "/app.jsx".to_string(),
                parse_success: success,
                strip_uids: false,
                last_revised_time: 9,
            })],
            HashSet::new(),
        );
        let results = worker.process(request).await.expect("processes");
        let [ParseOrPrintResult::PrintCode(printed)] = results.as_slice() else {
            panic!("expected one print result, got {results:?}");
        };
        assert!(printed.print_result.contains("data-uid=\"root\""));
        assert!(printed.highlight_bounds.contains_key(&Uid::intern("root")));
        assert_eq!(printed.last_revised_time, 9);
    }
}
