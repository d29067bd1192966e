//! End-to-end tests for the rating-update-and-broadcast pipeline
//!
//! Exercises the store, processor, and broker together, including the
//! concurrency properties: no lost updates under parallel match reports.

use std::sync::Arc;
use std::thread;

use ranking_engine::{MatchProcessor, RatingStore, SubscriptionBroker};
use types::events::RankingEvent;
use types::ids::CompetitorId;

fn id(s: &str) -> CompetitorId {
    CompetitorId::new(s)
}

#[tokio::test]
async fn create_report_broadcast_example() {
    let store = Arc::new(RatingStore::in_memory());
    let broker = Arc::new(SubscriptionBroker::default());
    let processor = MatchProcessor::new(store.clone(), broker.clone());

    // Empty store: the default initial rating is the fixed fallback.
    let initial = store.default_initial_rating();
    assert_eq!(initial, 1000);
    store.create(id("a"), initial).unwrap();
    store.create(id("b"), 1000).unwrap();

    let mut sub = broker.subscribe();

    let report = processor.report_match(&id("a"), &id("b"), false).unwrap();
    assert_eq!(report.winner.id, id("a"));
    assert_eq!(report.winner.rating, 1016);
    assert_eq!(report.loser.id, id("b"));
    assert_eq!(report.loser.rating, 984);

    // Exactly one RankingUpdate per competitor, winner first.
    let first = sub.recv().await.unwrap();
    let second = sub.recv().await.unwrap();
    assert!(matches!(&first, RankingEvent::RankingUpdate { competitor } if competitor.id == id("a") && competitor.rating == 1016));
    assert!(matches!(&second, RankingEvent::RankingUpdate { competitor } if competitor.id == id("b") && competitor.rating == 984));

    let ranking = store.ranking();
    assert_eq!(ranking[0].id, id("a"));
    assert_eq!(ranking[1].id, id("b"));
}

#[test]
fn disjoint_concurrent_reports_lose_no_updates() {
    let store = Arc::new(RatingStore::in_memory());
    let broker = Arc::new(SubscriptionBroker::default());
    let processor = Arc::new(MatchProcessor::new(store.clone(), broker));

    let pairs = 8;
    for i in 0..pairs {
        store.create(id(&format!("w{i}")), 1000).unwrap();
        store.create(id(&format!("l{i}")), 1000).unwrap();
    }

    let handles: Vec<_> = (0..pairs)
        .map(|i| {
            let processor = processor.clone();
            thread::spawn(move || {
                processor
                    .report_match(&id(&format!("w{i}")), &id(&format!("l{i}")), false)
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every pair ends exactly where its one sequential match would put it.
    for i in 0..pairs {
        assert_eq!(store.get(&id(&format!("w{i}"))).unwrap().rating, 1016);
        assert_eq!(store.get(&id(&format!("l{i}"))).unwrap().rating, 984);
    }
    assert_eq!(store.match_count(), pairs);
}

#[test]
fn shared_opponent_reports_serialize_without_lost_updates() {
    let store = Arc::new(RatingStore::in_memory());
    let broker = Arc::new(SubscriptionBroker::default());
    let processor = Arc::new(MatchProcessor::new(store.clone(), broker));

    store.create(id("x"), 1000).unwrap();
    store.create(id("a"), 1000).unwrap();
    store.create(id("b"), 1000).unwrap();

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|winner| {
            let processor = processor.clone();
            thread::spawn(move || processor.report_match(&id(winner), &id("x"), false).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever order the commits landed in, both effects are present:
    // x lost at 1000 (-16) then at 984 (-15); one winner beat x at 1000
    // (+16), the other beat x at 984 (+15).
    assert_eq!(store.match_count(), 2);
    assert_eq!(store.get(&id("x")).unwrap().rating, 969);

    let mut winners = [
        store.get(&id("a")).unwrap().rating,
        store.get(&id("b")).unwrap().rating,
    ];
    winners.sort_unstable();
    assert_eq!(winners, [1015, 1016]);
}

#[tokio::test]
async fn every_subscriber_observes_both_updates() {
    let store = Arc::new(RatingStore::in_memory());
    let broker = Arc::new(SubscriptionBroker::default());
    let processor = MatchProcessor::new(store.clone(), broker.clone());

    store.create(id("a"), 1000).unwrap();
    store.create(id("b"), 1000).unwrap();

    let mut subs: Vec<_> = (0..4).map(|_| broker.subscribe()).collect();
    processor.report_match(&id("a"), &id("b"), false).unwrap();

    for sub in &mut subs {
        let first = sub.recv().await.unwrap();
        let second = sub.recv().await.unwrap();
        assert_eq!(first.competitor().unwrap().id, id("a"));
        assert_eq!(second.competitor().unwrap().id, id("b"));
    }
}
