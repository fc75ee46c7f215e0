//! Variation clustering for implants and boosters.
//!
//! The export leaves graded implant sets and booster strengths without variation parents.
//! Members of one family differ only in a grade token and, for implant sets, in the last digit
//! of their model code, so stripping those yields a family key.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::known::categories;
use super::{Fixup, FixupClass, FixupContext};
use crate::error::DataResult;
use crate::model::Type;

pub const CLUSTER_IMPLANT_VARIATIONS: Fixup = Fixup {
    name: "cluster_implant_variations",
    class: FixupClass::Derivational,
    description: "Give graded implants of one family a common variation parent",
    run: cluster_implant_variations,
};

pub const CLUSTER_BOOSTER_VARIATIONS: Fixup = Fixup {
    name: "cluster_booster_variations",
    class: FixupClass::Derivational,
    description: "Give booster strengths of one family a common variation parent",
    run: cluster_booster_variations,
};

const BOOSTER_GROUP: &str = "Booster";

static IMPLANT_GRADES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:Low|Mid|High)-grade\b").expect("valid regex"));

static BOOSTER_STRENGTHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:Synth|Standard|Improved|Strong)\b").expect("valid regex"));

/// `SU-603` and `SU-605` belong to the same family `SU-60`
static MODEL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]{2}-\d{2})\d$").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

struct Family {
    tokens: &'static Lazy<Regex>,
    slot_attribute: &'static str,
    boosters: bool,
}

/// Family key of a type name: grade tokens removed, model code truncated
fn family_key(tokens: &Regex, name: &str) -> String {
    let stripped = tokens.replace_all(name, " ");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ");
    MODEL_CODE.replace(&collapsed, "$1").into_owned()
}

fn cluster_implant_variations(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    cluster_variations(
        ctx,
        Family {
            tokens: &IMPLANT_GRADES,
            slot_attribute: "implantness",
            boosters: false,
        },
    )
}

fn cluster_booster_variations(ctx: &mut FixupContext<'_>) -> DataResult<()> {
    cluster_variations(
        ctx,
        Family {
            tokens: &BOOSTER_STRENGTHS,
            slot_attribute: "boosterness",
            boosters: true,
        },
    )
}

fn cluster_variations(ctx: &mut FixupContext<'_>, family: Family) -> DataResult<()> {
    let implant_category = ctx.category(categories::IMPLANT)?;
    let booster_group = ctx.group(BOOSTER_GROUP)?;
    let slot_attribute = ctx.attribute(family.slot_attribute)?;

    // Members are visited in ascending id order, so each cluster's first id is its lowest
    let mut clusters: BTreeMap<(i64, String), Vec<i32>> = BTreeMap::new();
    for item in ctx.store.types_in_category(implant_category) {
        if (item.group_id == booster_group) != family.boosters {
            continue;
        }
        let Some(slot) = ctx.store.attribute_value(item.id, slot_attribute) else {
            debug!(type_id = item.id, "no slot, not clustered");
            continue;
        };
        let key = family_key(family.tokens, &item.name);
        clusters
            .entry((slot as i64, key))
            .or_default()
            .push(item.id);
    }

    let mut assigned = 0;
    for members in clusters.values() {
        let parent = members[0];
        for &id in members {
            if ctx.store.get::<Type>(id)?.variation_parent_type_id == Some(parent) {
                continue;
            }
            ctx.store.replace::<Type>(id, |t| t.with_variation_parent(parent))?;
            assigned += 1;
        }
    }
    debug!(clusters = clusters.len(), assigned, "clustered variations");
    Ok(())
}
