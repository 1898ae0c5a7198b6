//! Built-in recipe templates

use heapless::Vec;

use super::{Action, Recipe, Step};
use crate::time::Millis;

/// Host identifier reported for the standard recipe
pub const STANDARD_RECIPE_ID: u32 = 61680;

// (duration, interval, action); the first entry is the soak
const STANDARD_STEPS: [(Millis, Millis, &str); 5] = [
    (6000, 0, "L0 D9 N3 R1 T6000 G80"),
    (6000, 24_000, "L0 D7 N3 R1 T6000 G60"),
    (9000, 30_000, "L0 D7 N5 R1 T9000 G90"),
    (10_000, 35_000, "L0 D7 N5 R1 T10000 G100"),
    (9000, 0, "L0 D7 N5 R1 T9000 G100"),
];

impl Recipe {
    /// The default recipe: a 6 s soak, four attacks and one minute of
    /// finalization
    pub fn standard() -> Self {
        let mut steps = Vec::new();
        for (duration, interval, action) in STANDARD_STEPS {
            let _ = steps.push(Step::new(
                duration,
                interval,
                Action::try_from(action).unwrap_or_default(),
            ));
        }
        Recipe::from_parts(STANDARD_RECIPE_ID, 60_000, true, steps)
    }
}
