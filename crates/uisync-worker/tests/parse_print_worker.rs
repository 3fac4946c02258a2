//! Integration tests: requests through the worker handle and the byte
//! boundary.

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use uisync_core::model::ParsedTextFile;
use uisync_core::parser::parse_code_fresh;
use uisync_core::uid::Uid;
use uisync_worker::{
    MessageId, ParseFile, ParseOrPrint, ParseOrPrintResult, ParsePrintResultMessage,
    ParsePrintWorker, PrintCode, WorkerConfig, WorkerError, WorkerHandle, decode, encode,
};

const GALLERY: &str = include_str!("fixtures/gallery.jsx");

// ─── Helpers ─────────────────────────────────────────────────────────────

fn parse_file(file_name: &str, content: &str) -> ParseOrPrint {
    ParseOrPrint::ParseFile(ParseFile {
        file_name: file_name.to_string(),
        content: content.to_string(),
        previous_parsed: None,
        last_revised_time: 1,
    })
}

fn parsed(result: &ParseOrPrintResult) -> &ParsedTextFile {
    match result {
        ParseOrPrintResult::ParseFile(r) => &r.parse_result,
        ParseOrPrintResult::PrintCode(r) => panic!("expected a parse result for {}", r.file_name),
    }
}

fn config(max_concurrent_files: usize) -> WorkerConfig {
    WorkerConfig {
        max_concurrent_files,
        ..WorkerConfig::default()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn files_are_parsed_independently() {
    let worker = WorkerHandle::spawn(config(2));
    let results = worker
        .parse_print(
            vec![
                parse_file("/gallery.jsx", GALLERY),
                parse_file("/broken.jsx", "export const A = () => <div>\n"),
                parse_file("/theme.css", ".a { color: red }\n"),
            ],
            HashSet::new(),
        )
        .await
        .expect("worker answers");

    assert_eq!(results.len(), 3);
    assert!(matches!(parsed(&results[0]), ParsedTextFile::Success(_)));
    assert!(matches!(parsed(&results[1]), ParsedTextFile::Failure(_)));
    assert!(matches!(parsed(&results[2]), ParsedTextFile::Unparsed));
}

#[tokio::test]
async fn new_uids_avoid_the_known_set() {
    let fresh = parse_code_fresh("/gallery.jsx", GALLERY)
        .into_success()
        .expect("fixture parses");
    let known: HashSet<Uid> = fresh.all_uids().into_iter().collect();
    assert!(!known.is_empty());

    let worker = WorkerHandle::spawn(WorkerConfig::default());
    let results = worker
        .parse_print(vec![parse_file("/copy.jsx", GALLERY)], known.clone())
        .await
        .expect("worker answers");
    let copy = parsed(&results[0]).success().expect("copy parses");
    assert!(copy.all_uids().iter().all(|uid| !known.contains(uid)));
}

#[tokio::test]
async fn previous_parse_keeps_uids_stable() {
    let first = parse_code_fresh("/gallery.jsx", GALLERY)
        .into_success()
        .expect("fixture parses");
    let edited = GALLERY.replace("Recent photos", "Latest photos");

    let worker = WorkerHandle::spawn(WorkerConfig::default());
    let results = worker
        .parse_print(
            vec![ParseOrPrint::ParseFile(ParseFile {
                file_name: "/gallery.jsx".to_string(),
                content: edited,
                previous_parsed: Some(first.clone()),
                last_revised_time: 2,
            })],
            HashSet::new(),
        )
        .await
        .expect("worker answers");
    let second = parsed(&results[0]).success().expect("edit parses");
    assert_eq!(second.all_uids(), first.all_uids());
}

#[tokio::test]
async fn printing_without_uids_drops_the_attribute() {
    let success = parse_code_fresh("/gallery.jsx", GALLERY)
        .into_success()
        .expect("fixture parses");
    let worker = WorkerHandle::spawn(WorkerConfig::default());
    let results = worker
        .parse_print(
            vec![
                ParseOrPrint::PrintCode(PrintCode {
                    file_name: "/gallery.jsx".to_string(),
                    parse_success: success.clone(),
                    strip_uids: true,
                    last_revised_time: 5,
                }),
                ParseOrPrint::PrintCode(PrintCode {
                    file_name: "/gallery.jsx".to_string(),
                    parse_success: success,
                    strip_uids: false,
                    last_revised_time: 5,
                }),
            ],
            HashSet::new(),
        )
        .await
        .expect("worker answers");
    let [ParseOrPrintResult::PrintCode(stripped), ParseOrPrintResult::PrintCode(kept)] =
        results.as_slice()
    else {
        panic!("expected two print results");
    };
    assert!(!stripped.print_result.contains("data-uid"));
    assert!(kept.print_result.contains("data-uid"));
    assert!(!kept.highlight_bounds.is_empty());
}

#[tokio::test]
async fn clone_keeps_the_worker_alive() {
    let worker = WorkerHandle::spawn(config(1));
    let clone = worker.clone();
    drop(worker);
    let results = clone
        .parse_print(vec![parse_file("/gallery.jsx", GALLERY)], HashSet::new())
        .await;
    assert!(results.is_ok());
}

#[tokio::test]
async fn encoded_requests_round_trip() {
    let worker = ParsePrintWorker::default();
    let request = worker.request(vec![parse_file("/gallery.jsx", GALLERY)], HashSet::new());
    let expected_id = request.message_id;

    let bytes = encode(&request).expect("encodes");
    let response: ParsePrintResultMessage =
        decode(&worker.handle_encoded(&bytes).await.expect("handled")).expect("decodes");
    let ParsePrintResultMessage::FilesResult { message_id, files } = response else {
        panic!("expected files");
    };
    assert_eq!(message_id, expected_id);
    assert!(parsed(&files[0]).success().is_some());
}

#[tokio::test]
async fn undecodable_request_is_an_error() {
    let worker = ParsePrintWorker::default();
    let result = worker.handle_encoded(b"not msgpack").await;
    assert!(matches!(result, Err(WorkerError::Decode(_))));
}

#[tokio::test]
async fn each_worker_counts_its_own_requests() {
    let a = ParsePrintWorker::default();
    let b = ParsePrintWorker::default();
    let first = a.request(Vec::new(), HashSet::new());
    let second = a.request(Vec::new(), HashSet::new());
    let other = b.request(Vec::new(), HashSet::new());
    assert_eq!(
        [first.message_id, second.message_id, other.message_id],
        [MessageId(0), MessageId(1), MessageId(0)]
    );
    assert!(a.process(first).await.expect("empty request").is_empty());
}
