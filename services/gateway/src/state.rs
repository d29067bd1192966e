use ranking_engine::{MatchProcessor, RatingStore, SubscriptionBroker};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RatingStore>,
    pub broker: Arc<SubscriptionBroker>,
    pub processor: Arc<MatchProcessor>,
}

impl AppState {
    pub fn new(store: Arc<RatingStore>, broker: Arc<SubscriptionBroker>) -> Self {
        let processor = Arc::new(MatchProcessor::new(store.clone(), broker.clone()));
        Self {
            store,
            broker,
            processor,
        }
    }
}
