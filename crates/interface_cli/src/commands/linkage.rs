//! `hhtbs linkage`

use core_kernel::{LinkedTripId, PersonId, PortError};
use domain_ingest::SurveyStore;
use domain_travel::{LinkageResolution, LinkageResolver};
use tracing::info;

use super::CommandStatus;
use crate::cli::LinkageArgs;
use crate::error::CliError;

/// Whose trips to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkageTarget {
    Person(PersonId),
    Linked(LinkedTripId),
}

impl LinkageTarget {
    pub fn from_args(args: &LinkageArgs) -> Option<Self> {
        match (args.person, args.linked) {
            (Some(person), None) => Some(LinkageTarget::Person(PersonId::new(person))),
            (None, Some(linked)) => Some(LinkageTarget::Linked(LinkedTripId::new(linked))),
            _ => None,
        }
    }
}

/// Resolves linked trips from the stored legs
///
/// A linked trip id with no stored legs is not found; a person without
/// trips resolves to nothing.
pub async fn run(store: &dyn SurveyStore, target: LinkageTarget) -> Result<LinkageResolution, CliError> {
    let trips = match target {
        LinkageTarget::Person(id) => store.trips_for_person(id, None).await?,
        LinkageTarget::Linked(id) => {
            let legs = store.trips_linked(id, None).await?;
            if legs.is_empty() {
                return Err(PortError::not_found("LinkedTrip", id).into());
            }
            legs
        }
    };

    let resolution = LinkageResolver::resolve(&trips);
    info!(
        ?target,
        legs = trips.len(),
        linked_trips = resolution.linked_trips.len(),
        violations = resolution.violations.len(),
        "Resolved linkage"
    );
    Ok(resolution)
}

pub fn status(resolution: &LinkageResolution) -> CommandStatus {
    if resolution.is_consistent() {
        CommandStatus::Success
    } else {
        CommandStatus::Rejected
    }
}
