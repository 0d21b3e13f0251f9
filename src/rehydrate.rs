use crate::error::{OptionsError, OptionsResult};
use crate::record::{FieldSpec, OptionRecord, Scalar};
use crate::OptionMap;
use tracing::{debug, warn};

/// Copies values from `source` onto the fields of `destination`.
///
/// Only integers, strings and booleans are assigned, each into a field of the
/// matching kind. Any other value, or a value of the wrong kind for its field,
/// is a [`OptionsError::SchemaMismatch`]: the wire shape disagrees with the
/// record and nothing is written. Fields whose external name is missing from
/// `source` keep their current value.
pub fn rehydrate<R: OptionRecord>(source: &OptionMap, destination: &mut R) -> OptionsResult<()> {
    let mut staged = destination.clone();
    let mut assigned = 0;

    for spec in R::FIELDS {
        let Some(value) = source.get(spec.external) else {
            continue;
        };
        let scalar = Scalar::try_from(value).map_err(|found| mismatch(spec, "scalar", found))?;
        staged
            .assign_option(spec.external, scalar)
            .map_err(|m| mismatch(spec, m.expected, m.found))?;
        assigned += 1;
    }

    *destination = staged;
    debug!("Rehydrated {} of {} field(s)", assigned, R::FIELDS.len());
    Ok(())
}

/// Rehydrates a fresh record starting from its default value.
pub fn from_options<R: OptionRecord + Default>(source: &OptionMap) -> OptionsResult<R> {
    let mut record = R::default();
    rehydrate(source, &mut record)?;
    Ok(record)
}

fn mismatch(spec: &FieldSpec, expected: &'static str, found: &'static str) -> OptionsError {
    warn!(
        "Refusing to rehydrate `{}` ({}): expected {}, found {}",
        spec.external, spec.name, expected, found
    );
    OptionsError::SchemaMismatch {
        field: spec.external.to_string(),
        expected,
        found,
    }
}
