//! Intent detectors: boolean keyword/regex matches over the normalized utterance.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! cue {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect(stringify!($name)));
    };
}

/// Weekday names shared by detectors and the due-date extractor.
pub const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

/// Urgency vocabulary; a task cue as well as the `urgent` priority signal.
pub const URGENCY: &str =
    r"\b(?:urgent|urgently|asap|a\.s\.a\.p|immediately|emergency|critical|right away)\b";

/// Container and measure words a quantity can precede.
pub const UNITS: &str = "bags?|sacks?|box|boxes|pounds?|lbs?|kg|kilos?|kilograms?|grams?|ounces?|oz|\
gallons?|liters?|litres?|units?|pieces?|pcs|packs?|packets?|rolls|feet|ft|yards|meters?|metres?|\
tons|tonnes|bales?|bundles?|crates?|cans|bottles?|trays|flats|pallets?|cubic yards?|loads?";

cue!(
    TASK_WORDS,
    r"\b(?:task|tasks|todo|to-do|reminder|remind me|don['’]?t forget|remember to|need to|needs to|have to|has to)\b"
);
cue!(
    TASK_VERBS,
    r"\b(?:finish|complete|work on|fix|repair|call|email|schedule|follow up|weed|prune|harvest|mow)\b"
);
cue!(
    TASK_DEADLINE,
    &format!(r"\b(?:by|due|before|until|on|deadline)\s+(?:(?:this|next)\s+)?(?:{WEEKDAYS})\b")
);
cue!(URGENCY_WORDS, URGENCY);

cue!(
    ACQUIRE_VERBS,
    r"\b(?:buy|purchase|order|pick up|get some|stock up on|restock)\b"
);
cue!(NEED, r"\bneeds?\b(?:\s+(to)\b)?");
cue!(UNIT_WORDS, &format!(r"\b(?:{UNITS}|quantity|qty)\b"));
cue!(
    PRICE_WORDS,
    r"\$\s?\d|\b\d+(?:\.\d+)?\s*(?:dollars?|bucks|usd)\b|\b(?:costs?|price[ds]?|pricing|worth|value of)\b"
);
cue!(
    OWNERSHIP_OR_RENTAL,
    r"\b(?:i|we) (?:already )?(?:own|have) (?:a|an|some|\d+|one|two|three|four|five|six|seven|eight|nine|ten)\b|\bin stock\b|\b(?:borrow|borrowed|borrowing|rent|rented|renting|rental|lease|leased|leasing|loaner)\b"
);

cue!(
    PROJECT_WORDS,
    r"\b(?:project|projects|initiative|site|property|homestead|farm|acres?|land|parcel)\b"
);
cue!(
    PERMACULTURE,
    r"\b(?:zone ?\d|zones|guilds?|food forest|water system|water catchment|rainwater harvesting|swales?|keyline|soil|watershed|polyculture|permaculture|agroforestry|silvopasture)\b"
);
cue!(
    LAND_STATUS,
    r"\b(?:owned land|own the land|potential property|looking at (?:a |some )?(?:land|property))\b"
);

cue!(
    BUSINESS_PLAN,
    r"\b(?:business plan|executive summary|market analysis|market research|financial plan|financial projections?|marketing (?:plan|strategy)|swot|revenue model|operations plan|competitive analysis|funding request|break-even)\b"
);

/// Which detectors fired for one utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorHits {
    /// Task vocabulary present.
    pub task: bool,
    /// Inventory vocabulary present.
    pub inventory: bool,
    /// Project vocabulary present and not suppressed by an ambient project.
    pub project: bool,
    /// Business-plan vocabulary present (scope is checked during arbitration).
    pub business_plan: bool,
}

/// Runs every detector over `normalized` (lower-cased, whitespace-squashed).
#[must_use]
pub fn detect(normalized: &str, ambient_project: bool) -> DetectorHits {
    DetectorHits {
        task: task_cues(normalized),
        inventory: inventory_cues(normalized),
        project: !ambient_project && project_cues(normalized),
        business_plan: business_plan_cues(normalized),
    }
}

/// Task words, deadline phrasing with a weekday, action verbs or urgency.
#[must_use]
pub fn task_cues(normalized: &str) -> bool {
    TASK_WORDS.is_match(normalized)
        || TASK_DEADLINE.is_match(normalized)
        || TASK_VERBS.is_match(normalized)
        || URGENCY_WORDS.is_match(normalized)
}

/// Acquisition verbs, unit words, prices, ownership or rental phrasing.
#[must_use]
pub fn inventory_cues(normalized: &str) -> bool {
    ACQUIRE_VERBS.is_match(normalized)
        || acquisition_need(normalized)
        || UNIT_WORDS.is_match(normalized)
        || PRICE_WORDS.is_match(normalized)
        || OWNERSHIP_OR_RENTAL.is_match(normalized)
}

/// Project/site words, permaculture vocabulary or land-status phrasing.
#[must_use]
pub fn project_cues(normalized: &str) -> bool {
    PROJECT_WORDS.is_match(normalized)
        || PERMACULTURE.is_match(normalized)
        || LAND_STATUS.is_match(normalized)
}

/// Business-plan section vocabulary.
#[must_use]
pub fn business_plan_cues(normalized: &str) -> bool {
    BUSINESS_PLAN.is_match(normalized)
}

// "need 5 bags" is acquisition; "need to call" is a chore.
fn acquisition_need(normalized: &str) -> bool {
    NEED.captures_iter(normalized).any(|caps| caps.get(1).is_none())
}
