//! Apply a scenario's field changes to a baseline profile and rate model

use super::definition::ScenarioDefinition;
use crate::assumptions::RateModel;
use crate::error::Result;
use crate::profile::Profile;
use log::debug;

/// Produce the perturbed profile and rates for a scenario
///
/// The inputs are cloned; changes apply in declared order so a later change
/// sees the result of an earlier one on the same field.
pub fn apply_scenario(
    profile: &Profile,
    rates: &RateModel,
    definition: &ScenarioDefinition,
) -> Result<(Profile, RateModel)> {
    let context = format!("scenario '{}'", definition.id);
    let mut profile = profile.clone();
    let mut rates = rates.clone();

    for change in &definition.changes {
        let field = change.target().map_err(|e| e.context(&context))?;
        let before = field.get(&profile, &rates);
        let after = change.op.apply(before, change.value);
        field
            .set(&mut profile, &mut rates, after)
            .map_err(|e| e.context(&context))?;
        debug!("{}: {} {} -> {}", context, field, before, field.get(&profile, &rates));
    }

    profile.validate().map_err(|e| e.context(&context))?;
    rates.validate().map_err(|e| e.context(&context))?;

    Ok((profile, rates))
}
