//! Resources tax.
//!
//! A failed Resources test taxes the character. Funds absorb the loss
//! first, up to what the player is willing to spend; whatever is left over
//! raises the tax on Resources. Tax can never exceed the exponent, and a
//! character taxed all the way down may degrade Resources by one.

use pyre_core::{CharacterRecord, Patch, StatKey, Update};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MechError, MechResult};

/// Result of applying a tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOutcome {
    /// Funds dice afterwards.
    pub funds: u32,
    /// Resources tax afterwards.
    pub resources_tax: u32,
    /// Tax has reached the exponent; Resources may be degraded.
    pub overtaxed: bool,
}

/// Build the write for a tax of `amount`, spending at most `max_fund_loss`
/// funds dice before the tax falls on Resources itself.
pub fn tax_resources(
    record: &CharacterRecord,
    amount: u32,
    max_fund_loss: u32,
) -> (Patch, TaxOutcome) {
    let exponent = record.stats.resources.exponent;
    let mut patch = Patch::new(record.revision);

    if amount <= max_fund_loss {
        let funds = record.funds.saturating_sub(amount);
        patch.push(Update::SetFunds(funds));
        let outcome = TaxOutcome {
            funds,
            resources_tax: record.resources_tax,
            overtaxed: false,
        };
        return (patch, outcome);
    }

    let remainder = amount - max_fund_loss;
    let resources_tax = exponent.min(record.resources_tax.saturating_add(remainder));
    let overtaxed = resources_tax == exponent;
    patch.push(Update::SetFunds(0));
    patch.push(Update::SetResourcesTax(resources_tax));
    if overtaxed {
        warn!(character = %record.name, exponent, "resources overtaxed");
    } else {
        info!(character = %record.name, resources_tax, "resources taxed");
    }
    (
        patch,
        TaxOutcome {
            funds: 0,
            resources_tax,
            overtaxed,
        },
    )
}

/// Build the write that degrades an overtaxed Resources by one: exponent
/// and tax both drop, logged tests are cleared.
pub fn degrade_resources(record: &CharacterRecord) -> MechResult<Patch> {
    let exponent = record.stats.resources.exponent;
    if exponent == 0 || record.resources_tax < exponent {
        return Err(MechError::NotEligible(
            record.stats.display_name(StatKey::Resources).to_string(),
        ));
    }
    let lowered = record.resources_tax - 1;
    info!(character = %record.name, from = exponent, to = lowered, "resources degraded");
    Ok(Patch::new(record.revision).with(Update::DegradeResources {
        exponent: lowered,
        tax: lowered,
    }))
}
