//! Next revision inference for a service family.
//!
//! The live list of services in the cluster is the only record of which
//! revisions exist. Nothing is persisted: resolving twice without creating a
//! service in between returns the same revision.

use tracing::{debug, warn};

use crate::cloud::{ContainerPlatform, ListServicesRequest};
use crate::config::FamilyMatch;
use crate::error::{DeployError, DeployResult};
use crate::types::{FamilyName, RevisionVersion};

/// Revision number encoded in a service identifier.
///
/// Takes the text after the last `-`, drops every `v` and parses the rest.
/// Anything unparseable counts as revision 0.
#[must_use]
pub fn parse_revision(identifier: &str) -> u32 {
    let suffix = identifier
        .rsplit_once('-')
        .map_or("", |(_, suffix)| suffix);
    let digits: String = suffix.chars().filter(|c| *c != 'v').collect();

    match digits.parse::<u32>() {
        Ok(number) => number,
        Err(_) => {
            warn!(identifier = %identifier, "unparseable revision suffix, counting as 0");
            0
        }
    }
}

/// Whether an existing service identifier belongs to `family`.
#[must_use]
pub fn belongs_to_family(identifier: &str, family: &FamilyName, mode: FamilyMatch) -> bool {
    match mode {
        FamilyMatch::Contains => identifier.contains(family.as_str()),
        FamilyMatch::Strict => {
            let name = identifier
                .rsplit_once('/')
                .map_or(identifier, |(_, name)| name);
            name.strip_prefix(family.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|suffix| !suffix.is_empty() && !suffix.contains('-'))
        }
    }
}

/// Highest revision of `family` among `identifiers`, 0 when none match.
pub fn latest_revision<'a, I>(identifiers: I, family: &FamilyName, mode: FamilyMatch) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    identifiers
        .into_iter()
        .filter(|identifier| belongs_to_family(identifier, family, mode))
        .map(parse_revision)
        .max()
        .unwrap_or(0)
}

/// Revision following `latest`.
///
/// Fails once `latest` is the largest representable revision instead of
/// handing back a name that is already taken.
pub fn revision_after(latest: u32, family: &FamilyName) -> DeployResult<RevisionVersion> {
    RevisionVersion::new(latest)
        .next()
        .ok_or_else(|| DeployError::RevisionsExhausted(family.to_string()))
}

/// Revision following the highest one found among `identifiers`.
pub fn next_revision<'a, I>(
    identifiers: I,
    family: &FamilyName,
    mode: FamilyMatch,
) -> DeployResult<RevisionVersion>
where
    I: IntoIterator<Item = &'a str>,
{
    revision_after(latest_revision(identifiers, family, mode), family)
}

/// Page through every service in `cluster` and compute the next revision of
/// `family`.
pub async fn resolve_next_version(
    platform: &dyn ContainerPlatform,
    cluster: &str,
    family: &FamilyName,
    mode: FamilyMatch,
) -> DeployResult<RevisionVersion> {
    let mut latest = 0;
    let mut next_token: Option<String> = None;
    let mut pages = 0_usize;

    loop {
        let request = ListServicesRequest {
            cluster: cluster.to_owned(),
            next_token: next_token.take(),
        };
        let page = platform.list_services(&request).await?;
        pages += 1;

        let page_latest =
            latest_revision(page.service_arns.iter().map(String::as_str), family, mode);
        latest = latest.max(page_latest);

        debug!(
            cluster = %cluster,
            family = %family,
            page = pages,
            services = page.service_arns.len(),
            latest,
            "scanned service page"
        );

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    let version = revision_after(latest, family)?;
    debug!(cluster = %cluster, family = %family, version = %version, "resolved next version");
    Ok(version)
}
