use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cardportal_client::config::DEFAULT_SEARCH_DEBOUNCE;
use cardportal_client::{ApiError, ListController, ListSource};
use cardportal_core::{ListQuery, Page};

/// Records every query; optionally stalls on requests starting at a given row.
#[derive(Clone, Default)]
struct Recorder {
    queries: Arc<Mutex<Vec<ListQuery>>>,
    stall_on: Option<(u64, Duration)>,
}

#[async_trait]
impl ListSource for Recorder {
    type Row = String;

    async fn list(&self, query: &ListQuery) -> Result<Page<String>, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some((start, delay)) = self.stall_on {
            if query.start == start {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(Page {
            data: vec![query.search.clone()],
            count: 1,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn typing_burst_sends_one_request_with_final_text() {
    let source = Recorder::default();
    let queries = source.queries.clone();
    let ctl = ListController::new(source, 10, DEFAULT_SEARCH_DEBOUNCE);

    for text in ["a", "ab", "abc"] {
        ctl.search(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(queries.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let sent = queries.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].search, "abc");
    assert_eq!(ctl.state().page.data, vec!["abc".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_search_does_not_overwrite_newer_page() {
    let source = Recorder {
        stall_on: Some((0, Duration::from_secs(5))),
        ..Default::default()
    };
    let queries = source.queries.clone();
    let ctl = ListController::new(source, 10, DEFAULT_SEARCH_DEBOUNCE);

    ctl.search("old");
    // Debounce fires; the "old" request is now stuck in flight.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(ctl.state().loading);

    // A page change goes out immediately and completes first.
    ctl.set_page(1).await;
    assert_eq!(ctl.state().page.data, vec!["old".to_string()]);
    assert_eq!(ctl.state().query.start, 10);

    // Let the stalled request finish; its answer must be dropped.
    tokio::time::sleep(Duration::from_secs(6)).await;
    let state = ctl.state();
    assert_eq!(state.query.start, 10);
    assert!(!state.loading);
    assert_eq!(queries.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn settle_waits_for_slow_final_search() {
    let source = Recorder {
        stall_on: Some((0, Duration::from_secs(2))),
        ..Default::default()
    };
    let ctl = ListController::new(source, 10, DEFAULT_SEARCH_DEBOUNCE);

    ctl.search("acme");
    assert_eq!(ctl.state().pending.as_deref(), Some("acme"));

    let state = ctl.settle().await;
    assert!(!state.loading);
    assert!(state.pending.is_none());
    assert_eq!(state.query.search, "acme");
    assert_eq!(state.page.data, vec!["acme".to_string()]);
}
