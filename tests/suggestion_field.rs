mod support;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shoplist::access::HttpMethod;
use shoplist::app::{ArticleSearch, Event, SuggestionField, SuggestionPhase, SuggestionSettings};
use shoplist::domain::Article;
use shoplist::ui::Segment;
use support::{article_json, search_json, Harness};

/// Substring search over a fixed set of names, recording every query.
struct Catalog {
    names: Vec<&'static str>,
    latency: Duration,
    queries: Mutex<Vec<String>>,
    completed: AtomicUsize,
}

impl Catalog {
    fn new(names: &[&'static str]) -> Arc<Self> {
        Self::slow(names, Duration::from_millis(50))
    }

    fn slow(names: &[&'static str], latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            names: names.to_vec(),
            latency,
            queries: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleSearch for Catalog {
    async fn search(&self, query: &str, _limit: u32) -> shoplist::Result<Vec<Article>> {
        self.queries.lock().unwrap().push(query.to_string());
        tokio::time::sleep(self.latency).await;
        self.completed.fetch_add(1, Ordering::SeqCst);

        let needle = query.to_lowercase();
        Ok(self
            .names
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(|name| Article::new(name.to_lowercase(), *name))
            .collect())
    }
}

fn field(catalog: &Arc<Catalog>) -> SuggestionField {
    SuggestionField::new(catalog.clone(), SuggestionSettings::default())
}

fn names(field: &SuggestionField) -> Vec<String> {
    field.state().results.iter().map(|a| a.name.clone()).collect()
}

async fn type_text(field: &mut SuggestionField, text: &str) {
    field.dispatch(Event::Input(text.to_string())).unwrap();
    tokio::time::advance(Duration::from_millis(100)).await;
}

#[tokio::test(start_paused = true)]
async fn test_quick_typing_issues_a_single_search() {
    let catalog = Catalog::new(&["Tomate", "Tomme", "Thon"]);
    let mut field = field(&catalog);

    for text in ["t", "to", "tom", "toma", "tomat"] {
        type_text(&mut field, text).await;
    }
    field.settle().await.unwrap();

    assert_eq!(catalog.queries(), vec!["tomat"]);
    assert_eq!(names(&field), vec!["Tomate"]);
    assert_eq!(field.state().phase(), SuggestionPhase::Showing);
}

#[tokio::test(start_paused = true)]
async fn test_nothing_is_searched_below_three_characters() {
    let catalog = Catalog::new(&["Tomate"]);
    let mut field = field(&catalog);

    field.dispatch(Event::Input("  to  ".into())).unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    field.settle().await.unwrap();

    assert!(catalog.queries().is_empty());
    assert!(!field.viewmodel().visible);
}

#[tokio::test(start_paused = true)]
async fn test_query_is_trimmed() {
    let catalog = Catalog::new(&["Tomate"]);
    let mut field = field(&catalog);

    field.dispatch(Event::Input("  tom ".into())).unwrap();
    field.settle().await.unwrap();

    assert_eq!(catalog.queries(), vec!["tom"]);
    assert_eq!(field.state().text, "  tom ");
}

#[tokio::test(start_paused = true)]
async fn test_zero_results_suppress_longer_text_until_it_shrinks() {
    let catalog = Catalog::new(&["Tomate"]);
    let mut field = field(&catalog);

    field.dispatch(Event::Input("milk".into())).unwrap();
    field.settle().await.unwrap();
    assert_eq!(field.state().suppressed_prefix.as_deref(), Some("milk"));
    assert_eq!(field.state().phase(), SuggestionPhase::Suppressed);

    field.dispatch(Event::Input("milk2".into())).unwrap();
    field.settle().await.unwrap();
    assert_eq!(catalog.queries(), vec!["milk"]);

    field.dispatch(Event::Input("mi".into())).unwrap();
    assert_eq!(field.state().suppressed_prefix, None);

    field.dispatch(Event::Input("mil".into())).unwrap();
    field.settle().await.unwrap();
    assert_eq!(catalog.queries(), vec!["milk", "mil"]);
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_selection_replaces_text_without_searching() {
    let catalog = Catalog::new(&["Tomate", "Tomme"]);
    let selected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&selected);
    let mut field = field(&catalog).on_select(move |article| {
        sink.lock().unwrap().push(article.name.clone());
    });

    field.dispatch(Event::Input("tom".into())).unwrap();
    field.settle().await.unwrap();
    assert_eq!(names(&field), vec!["Tomate", "Tomme"]);

    field.dispatch(Event::KeyDown).unwrap();
    field.dispatch(Event::KeyDown).unwrap();
    field.dispatch(Event::KeyDown).unwrap();
    assert_eq!(field.state().selected, Some(1));
    field.dispatch(Event::Enter).unwrap();
    field.settle().await.unwrap();

    assert_eq!(*selected.lock().unwrap(), vec!["Tomme"]);
    assert_eq!(field.state().text, "Tomme");
    assert_eq!(catalog.queries(), vec!["tom"]);
    assert!(!field.viewmodel().visible);
    assert!(!field.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_pointer_selection_and_later_typing_searches_again() {
    let catalog = Catalog::new(&["Tomate", "Tomme"]);
    let mut field = field(&catalog);

    field.dispatch(Event::Input("tom".into())).unwrap();
    field.settle().await.unwrap();
    field.dispatch(Event::PointerHover(1)).unwrap();
    assert_eq!(field.state().selected, Some(1));
    field.dispatch(Event::PointerSelect(0)).unwrap();
    assert_eq!(field.state().text, "Tomate");

    field.dispatch(Event::Input("Tomates".into())).unwrap();
    field.settle().await.unwrap();
    assert_eq!(catalog.queries(), vec!["tom", "Tomates"]);
}

#[tokio::test(start_paused = true)]
async fn test_escape_hides_and_focus_reopens() {
    let catalog = Catalog::new(&["Tomate"]);
    let mut field = field(&catalog);

    field.dispatch(Event::Input("tom".into())).unwrap();
    field.settle().await.unwrap();
    field.dispatch(Event::KeyDown).unwrap();

    field.dispatch(Event::Escape).unwrap();
    assert!(!field.viewmodel().visible);
    assert_eq!(field.state().selected, None);

    field.dispatch(Event::Focus).unwrap();
    assert!(field.viewmodel().visible);

    field.dispatch(Event::OutsidePress).unwrap();
    assert!(!field.viewmodel().visible);
    assert_eq!(names(&field), vec!["Tomate"]);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_search_results_are_never_shown() {
    let catalog = Catalog::slow(&["Tomate", "Tomme"], Duration::from_secs(1));
    let mut field = field(&catalog);

    field.dispatch(Event::Input("tom".into())).unwrap();
    tokio::time::advance(Duration::from_millis(301)).await;
    field.next().await.unwrap();
    tokio::time::advance(Duration::from_millis(100)).await;

    field.dispatch(Event::Input("tomm".into())).unwrap();
    field.settle().await.unwrap();

    assert_eq!(catalog.queries(), vec!["tom", "tomm"]);
    assert_eq!(names(&field), vec!["Tomme"]);
    assert_eq!(catalog.completed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shrinking_text_drops_the_running_search() {
    let catalog = Catalog::slow(&["Tomate", "Tomme"], Duration::from_secs(1));
    let mut field = field(&catalog);

    field.dispatch(Event::Input("tom".into())).unwrap();
    tokio::time::advance(Duration::from_millis(301)).await;
    field.next().await.unwrap();
    assert_eq!(field.state().phase(), SuggestionPhase::Searching);

    field.dispatch(Event::Input("to".into())).unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    field.settle().await.unwrap();

    let vm = field.viewmodel();
    assert_eq!(field.state().text, "to");
    assert!(!vm.visible);
    assert!(vm.rows.is_empty());
    assert_eq!(field.state().phase(), SuggestionPhase::Idle);
    assert_eq!(catalog.queries(), vec!["tom"]);
    assert_eq!(catalog.completed.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_selection_drops_a_newer_running_search() {
    let catalog = Catalog::slow(&["Tomate", "Tomme"], Duration::from_secs(1));
    let mut field = field(&catalog);

    field.dispatch(Event::Input("tom".into())).unwrap();
    field.settle().await.unwrap();
    field.dispatch(Event::Input("tomm".into())).unwrap();
    tokio::time::advance(Duration::from_millis(301)).await;
    field.next().await.unwrap();
    assert!(field.is_busy());

    field.dispatch(Event::PointerSelect(0)).unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    field.settle().await.unwrap();

    assert_eq!(field.state().text, "Tomate");
    assert!(!field.viewmodel().visible);
    assert!(!field.is_busy());
    assert_eq!(catalog.queries(), vec!["tom", "tomm"]);
    assert_eq!(catalog.completed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_field_aborts_outstanding_work() {
    let catalog = Catalog::slow(&["Tomate"], Duration::from_secs(1));
    let mut field = field(&catalog);

    field.dispatch(Event::Input("tom".into())).unwrap();
    tokio::time::advance(Duration::from_millis(301)).await;
    field.next().await.unwrap();
    tokio::task::yield_now().await;
    assert!(field.is_busy());

    drop(field);
    tokio::time::advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;

    assert_eq!(catalog.queries(), vec!["tom"]);
    assert_eq!(catalog.completed.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_field_searches_through_the_api() {
    let h = Harness::new();
    h.backend.json(
        HttpMethod::Get,
        "/articles/search",
        200,
        search_json(
            "tom",
            &[article_json("a1", "Tomate", 12), article_json("a2", "Tomme", 3)],
        ),
    );
    let mut field = h.client.suggestion_field();

    field.dispatch(Event::Input("tom".into())).unwrap();
    field.settle().await.unwrap();

    assert_eq!(h.backend.count(HttpMethod::Get, "/articles/search"), 1);
    let url = reqwest::Url::parse(&h.backend.requests()[0].url).unwrap();
    assert_eq!(url.query(), Some("q=tom&limit=20"));

    let vm = field.viewmodel();
    assert!(vm.visible);
    assert_eq!(vm.rows.len(), 2);
    assert_eq!(vm.rows[0].usage_count, 12);
    assert_eq!(
        vm.rows[0].segments,
        vec![
            Segment {
                text: "Tom".into(),
                matched: true
            },
            Segment {
                text: "ate".into(),
                matched: false
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_hides_the_list() {
    let h = Harness::new();
    h.backend
        .raw(HttpMethod::Get, "/articles/search", 503, "unavailable");
    let mut field = h.client.suggestion_field();

    field.dispatch(Event::Input("tom".into())).unwrap();
    field.settle().await.unwrap();

    let vm = field.viewmodel();
    assert!(!vm.visible);
    assert!(vm.rows.is_empty());
    assert_eq!(field.state().suppressed_prefix, None);
}
