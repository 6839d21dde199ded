//! Shared fixtures for integration tests.

use std::sync::Arc;

use shelfcheck::cache::{ManualClock, TtlCache};
use shelfcheck::judge::{BatchJudgeClient, MockJudgeBackend, RetryConfig};
use shelfcheck::model::{CandidateProduct, IngredientForm, IngredientSpec};
use shelfcheck::validator::{Validator, ValidatorConfig};

pub type MockValidator = Validator<Arc<MockJudgeBackend>, Arc<TtlCache<Arc<ManualClock>>>>;

/// Validator whose judge, cache and clock are all reachable from the test.
pub struct Harness {
    pub judge: Arc<MockJudgeBackend>,
    pub cache: Arc<TtlCache<Arc<ManualClock>>>,
    pub clock: Arc<ManualClock>,
    pub validator: MockValidator,
}

impl Harness {
    pub fn new(judge: MockJudgeBackend) -> Self {
        Self::with_config(judge, ValidatorConfig::default())
    }

    pub fn with_config(judge: MockJudgeBackend, config: ValidatorConfig) -> Self {
        let judge = Arc::new(judge);
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(TtlCache::with_clock(1_000, clock.clone()));
        let client = BatchJudgeClient::new(judge.clone()).with_retry(RetryConfig::none());
        let validator = Validator::new(client, cache.clone(), config);

        Self {
            judge,
            cache,
            clock,
            validator,
        }
    }
}

pub fn chicken_breast() -> IngredientSpec {
    IngredientSpec::new("chicken breast")
        .with_form(IngredientForm::Raw)
        .with_quantity(500.0, "g")
}

pub fn whole_milk() -> IngredientSpec {
    IngredientSpec::new("whole milk")
        .with_form(IngredientForm::Liquid)
        .with_quantity(2.0, "l")
}

pub fn eggs() -> IngredientSpec {
    IngredientSpec::new("eggs")
        .with_form(IngredientForm::Fresh)
        .with_quantity(12.0, "count")
}

/// A mixed shelf for [`chicken_breast`]: one clear pass, two clear fails, two for the judge.
pub fn chicken_shelf() -> Vec<CandidateProduct> {
    vec![
        CandidateProduct::new("c-1", "Organic Chicken Breast Fillets 500g")
            .with_categories(["Meat", "Poultry"])
            .with_brand("Farmhouse")
            .with_price(6.5),
        CandidateProduct::new("c-2", "Chicken Flavoured Stock Powder")
            .with_size_text("120g")
            .with_categories(["Pantry", "Stock & Gravy"]),
        CandidateProduct::new("c-3", "Chicken Breast Fillets")
            .with_categories(["Meat", "Poultry"]),
        CandidateProduct::new("c-4", "Chicken & Rice Dry Dog Food 2kg")
            .with_categories(["Pets", "Dog Food"]),
        CandidateProduct::new("c-5", "Free Range Chicken Breast Family Pack")
            .with_size_text("1.2 kg")
            .with_categories(["Meat"]),
    ]
}
