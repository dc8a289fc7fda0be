use std::collections::HashSet;

use related_posts::{
    Document, IdentifierFilter, RankWarning, RankerConfig, Rankings, SimilarityRanker,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ranker(config: RankerConfig) -> SimilarityRanker {
    init_tracing();
    SimilarityRanker::new(config).unwrap()
}

fn blog() -> Vec<Document> {
    vec![
        Document::new(
            "posts/rust-ownership.md",
            "Rust ownership and borrowing make memory safety explicit. The borrow checker enforces ownership rules.",
        ),
        Document::new(
            "posts/rust-lifetimes.md",
            "Lifetimes in Rust describe how long borrowing lasts. The borrow checker uses lifetimes and ownership.",
        ),
        Document::new(
            "posts/sourdough.md",
            "Sourdough bread needs a starter, flour, water and a long fermentation. Bake the bread hot.",
        ),
        Document::new(
            "posts/baguette.md",
            "A baguette is bread made from flour, water, salt and yeast. Fermentation builds flavour in bread.",
        ),
        Document::new(
            "pages/about.md",
            "About this blog: Rust, bread, and borrowing flour from neighbours.",
        ),
        Document::new(
            "posts/marathon.md",
            "Marathon training means long runs, tempo runs and rest. Training plans balance mileage.",
        ),
        Document::new(
            "posts/trail-running.md",
            "Trail running training adds hills to long runs. Mileage on trails builds strength.",
        ),
    ]
}

fn assert_well_formed(rankings: &Rankings, corpus_size: usize) {
    assert_eq!(rankings.len(), corpus_size);
    for (id, list) in rankings.iter() {
        assert!(list.iter().all(|n| n.id != id), "{id} listed as its own neighbour");
        assert_eq!(list.len(), corpus_size - 1);
        assert!(list.windows(2).all(|w| w[0].score >= w[1].score), "{id} not sorted");
        assert!(list.iter().all(|n| (-1.0..=1.0).contains(&n.score)));
    }
}

#[test]
fn pets_rank_above_stock_market() {
    let config = RankerConfig::default()
        .with_num_topics(2)
        .with_min_token_count(1)
        .with_stop_words::<&str>(&[]);
    let docs = vec![
        Document::new("A", "cats are great pets"),
        Document::new("B", "dogs are great pets"),
        Document::new("C", "stock market rallies today"),
    ];
    let rankings = ranker(config).rank(&docs);
    assert_well_formed(&rankings, 3);

    let a = rankings.get("A").unwrap();
    assert_eq!(a[0].id, "B");
    assert_eq!(a[1].id, "C");
    assert!(a[0].score > a[1].score);

    let b = rankings.get("B").unwrap();
    assert_eq!(b[0].id, "A");
    assert!(b[0].score > b[1].score);
}

#[test]
fn pets_rank_above_stock_market_with_default_settings() {
    // "are", "great" and "today" are English stop words; only "pets" is
    // shared by two documents.
    let docs = vec![
        Document::new("A", "cats are great pets"),
        Document::new("B", "dogs are great pets"),
        Document::new("C", "stock market rallies today"),
    ];
    let ranker = ranker(RankerConfig::default());
    let analysis = ranker.analyze(&docs);
    assert!(analysis.vocabulary.id("are").is_none());
    assert!(analysis.vocabulary.id("pets").is_some());

    let related = ranker.related_posts(&docs);
    let a = related.related("A");
    assert_eq!(a[0].id, "B");
    assert_eq!(a[1].id, "C");
    assert!(a[0].score > a[1].score);
    assert_eq!(related.related("B")[0].id, "A");
}

#[test]
fn undecodable_document_is_still_ranked() {
    let docs = vec![
        Document::from_utf8("posts/broken.md", &[0xc3, 0x28, 0xff]),
        Document::new("posts/cargo.md", "rust cargo crates"),
        Document::new("posts/borrow.md", "rust cargo borrowing"),
    ];
    let related = ranker(RankerConfig::default()).related_posts(&docs);

    assert_eq!(related.len(), 3);
    let broken = related.related("posts/broken.md");
    assert_eq!(broken.len(), 2);
    assert!(broken.iter().all(|n| n.score == 0.0));
    assert_eq!(related.related("posts/cargo.md")[0].id, "posts/borrow.md");
    assert!(related.warnings().is_empty());
}

#[test]
fn empty_corpus_gives_empty_result() {
    let ranker = ranker(RankerConfig::default());
    assert!(ranker.rank(&[]).is_empty());
    assert!(ranker.related_posts(&[]).is_empty());
}

#[test]
fn single_document_has_no_neighbours() {
    let docs = [Document::new("solo", "just one post here")];
    let related = ranker(RankerConfig::default()).related_posts(&docs);
    assert_eq!(related.len(), 1);
    assert!(related.related("solo").is_empty());
}

#[test]
fn cap_of_two_on_shared_vocabulary() {
    let config = RankerConfig::default()
        .with_max_related_posts(2)
        .with_stop_words::<&str>(&[]);
    let docs: Vec<Document> = (0..5)
        .map(|i| {
            let text = format!("shared words everywhere topic{} topic{}", i % 2, i % 3);
            Document::new(format!("doc{i}"), text)
        })
        .collect();
    let related = ranker(config).related_posts(&docs);
    assert_eq!(related.len(), 5);
    for (_, list) in related.iter() {
        assert_eq!(list.len(), 2);
    }
}

#[test]
fn cap_never_exceeds_corpus_size_minus_one() {
    let config = RankerConfig::default().with_max_related_posts(50);
    let docs = blog();
    let related = ranker(config).related_posts(&docs);
    for (_, list) in related.iter() {
        assert_eq!(list.len(), docs.len() - 1);
    }
}

#[test]
fn stop_word_only_document_does_not_break_pipeline() {
    let docs = vec![
        Document::new("empty", "the and of the a"),
        Document::new("x", "compilers parse tokens into trees"),
        Document::new("y", "parsers turn tokens into syntax trees"),
    ];
    let ranker = ranker(RankerConfig::default());
    let analysis = ranker.analyze(&docs);
    assert_eq!(analysis.vectors[0].nnz(), 0);

    let rankings = analysis.rankings();
    assert_well_formed(&rankings, 3);
    assert!(rankings.get("empty").unwrap().iter().all(|n| n.score == 0.0));
    assert_eq!(rankings.get("x").unwrap()[0].id, "y");
}

#[test]
fn topical_clusters_are_found() {
    let docs = blog();
    let rankings = ranker(RankerConfig::default().with_num_topics(3)).rank(&docs);
    assert_well_formed(&rankings, docs.len());

    assert_eq!(rankings.get("posts/rust-ownership.md").unwrap()[0].id, "posts/rust-lifetimes.md");
    assert_eq!(rankings.get("posts/marathon.md").unwrap()[0].id, "posts/trail-running.md");
    assert_eq!(rankings.get("posts/sourdough.md").unwrap()[0].id, "posts/baguette.md");
}

#[test]
fn ranking_is_idempotent() {
    let docs = blog();
    let ranker = ranker(RankerConfig::default());
    let first = ranker.rank(&docs);
    let second = ranker.rank(&docs);
    for ((id_a, a), (id_b, b)) in first.iter().zip(second.iter()) {
        assert_eq!(id_a, id_b);
        let order_a: Vec<&str> = a.iter().map(|n| n.id.as_str()).collect();
        let order_b: Vec<&str> = b.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order_a, order_b);
    }
}

#[test]
fn excluded_pages_never_fill_slots() {
    let config = RankerConfig::default()
        .with_max_related_posts(3)
        .with_exclude_pattern("pages");
    let docs = blog();
    let related = ranker(config).related_posts(&docs);
    for (id, list) in related.iter() {
        assert_eq!(list.len(), 3, "{id} under-filled");
        assert!(list.iter().all(|n| !n.id.contains("pages")));
    }
    // pages still get their own entry
    assert_eq!(related.related("pages/about.md").len(), 3);
}

#[test]
fn unresolvable_neighbours_warn_and_continue() {
    let docs = blog();
    let rankings = ranker(RankerConfig::default()).rank(&docs);
    let known: HashSet<String> = docs
        .iter()
        .map(|d| d.id.clone())
        .filter(|id| id != "posts/baguette.md")
        .collect();

    let related = rankings.select(&known, &IdentifierFilter::default(), 2);
    assert_eq!(related.len(), docs.len());
    for (_, list) in related.iter() {
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|n| n.id != "posts/baguette.md"));
    }
    assert!(related.warnings().contains(&RankWarning::MissingDocument {
        document: "posts/sourdough.md".to_string(),
        neighbor: "posts/baguette.md".to_string(),
    }));
}

#[test]
fn scores_are_exposed_for_display() {
    let docs = blog();
    let related = ranker(RankerConfig::default()).related_posts(&docs);
    let id = "posts/marathon.md";
    for n in related.related(id) {
        assert_eq!(related.score(id, &n.id), Some(n.score));
        let formatted = related.format_score(id, &n.id).unwrap();
        assert_eq!(formatted.split('.').nth(1).map(str::len), Some(3));
    }
}

#[test]
fn settings_json_drives_the_ranker() {
    let config = RankerConfig::from_json_str(
        r#"{"MAX_RELATED_POSTS": 1, "NUM_TOPICS": 3, "exclude_patterns": ["pages"], "THEME": "notmyidea"}"#,
    )
    .unwrap();
    let related = ranker(config).related_posts(&blog());
    assert_eq!(related.related("posts/trail-running.md")[0].id, "posts/marathon.md");
    assert!(related.iter().all(|(_, list)| list.len() == 1));
}

#[test]
fn results_serialize_for_templates() {
    let related = ranker(RankerConfig::default().with_max_related_posts(1)).related_posts(&blog());
    let json = serde_json::to_value(&related).unwrap();
    assert!(json["related"]["posts/marathon.md"].is_array());
    assert!(json["scores"]["posts/marathon.md"].is_object());
}
