use rust_decimal::Decimal;

use crate::models::Observation;

/// Decide whether a fresh observation is a new low worth alerting on.
///
/// `prior_minimum` is the trailing window minimum computed BEFORE the
/// observation was inserted, so the reading never competes with itself and
/// a product with no history never alerts on its first reading.
///
/// Strict less-than only: matching the old low is not a new low. There is
/// deliberately no hysteresis; every qualifying drop alerts, however small
/// and however recent the previous alert.
pub fn is_new_low(observation: &Observation, prior_minimum: Option<Decimal>) -> bool {
    match prior_minimum {
        Some(minimum) if observation.available => observation.price < minimum,
        _ => false,
    }
}
