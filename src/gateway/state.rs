use std::sync::Arc;

use crate::cache::ValidationCache;
use crate::judge::JudgeBackend;
use crate::validator::Validator;

pub struct HandlerState<B, C> {
    pub validator: Arc<Validator<B, C>>,
}

impl<B, C> HandlerState<B, C>
where
    B: JudgeBackend + 'static,
    C: ValidationCache + 'static,
{
    pub fn new(validator: Validator<B, C>) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }

    pub fn from_shared(validator: Arc<Validator<B, C>>) -> Self {
        Self { validator }
    }
}

// Manual impl: only the `Arc` is cloned, so `B` and `C` need not be `Clone`.
impl<B, C> Clone for HandlerState<B, C> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
        }
    }
}
