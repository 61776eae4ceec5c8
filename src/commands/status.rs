use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::cli::StatusArgs;
use crate::util::read_json;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CatalogCounts {
    pub(crate) entities: usize,
    pub(crate) by_state: BTreeMap<&'static str, usize>,
    pub(crate) attributes: usize,
    pub(crate) actions: usize,
    pub(crate) optional_actions: usize,
    pub(crate) alarms: usize,
    pub(crate) threshold_alerts: usize,
    pub(crate) avcs: usize,
    pub(crate) hidden: usize,
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(input = %args.input.display(), "status requested");

    if !args.input.exists() {
        warn!(path = %args.input.display(), "parsed catalog missing");
        return Ok(());
    }

    let catalog: Catalog = read_json(&args.input)?;
    if catalog.is_empty() {
        warn!(path = %args.input.display(), "catalog has no entities");
    }
    for version in &catalog.versions {
        info!(
            name = %version.name,
            version = %version.version,
            created = %version.create_time,
            sha256 = %version.sha256,
            "version heading"
        );
    }

    let counts = count_catalog(&catalog);
    info!(
        entities = counts.entities,
        attributes = counts.attributes,
        actions = counts.actions,
        optional_actions = counts.optional_actions,
        alarms = counts.alarms,
        threshold_alerts = counts.threshold_alerts,
        avcs = counts.avcs,
        hidden = counts.hidden,
        "catalog summary"
    );
    for (state, count) in &counts.by_state {
        info!(state = %state, count, "entities by state");
    }

    Ok(())
}

pub(crate) fn count_catalog(catalog: &Catalog) -> CatalogCounts {
    let mut counts = CatalogCounts {
        entities: catalog.len(),
        ..CatalogCounts::default()
    };

    for entity in catalog.iter() {
        *counts.by_state.entry(entity.state.as_str()).or_default() += 1;
        counts.attributes += entity.attributes.len();
        counts.actions += entity.actions.len();
        counts.optional_actions += entity.optional_actions.len();
        counts.alarms += entity.alarms.as_ref().map_or(0, |table| table.alarms.len());
        counts.threshold_alerts += entity.tcas.as_ref().map_or(0, |table| table.alerts.len());
        counts.avcs += entity
            .avcs
            .as_ref()
            .map_or(0, |table| table.avc_numbers().count());
        if entity.hidden {
            counts.hidden += 1;
        }
    }

    counts
}
