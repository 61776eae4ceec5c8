use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Serialize;
use tracing::info;

use crate::catalog::{Catalog, ClassId};
use crate::cli::NamesArgs;
use crate::util::{camel_case, read_json, write_json_pretty};

const OUTPUT_FILE: &str = "attrNames_test.json";

/// Generated identifier names for one class, used to check that generated
/// attribute constants stay stable across releases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ClassNames {
    pub(crate) name: String,
    pub(crate) filename: String,
    pub(crate) camel_case: String,
    #[serde(rename = "ClassID")]
    pub(crate) class_id: ClassId,
    pub(crate) attributes: BTreeMap<usize, AttributeNames>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AttributeNames {
    pub(crate) name: String,
    pub(crate) camel_case: String,
    #[serde(rename = "Final")]
    pub(crate) final_name: String,
    pub(crate) index: usize,
}

pub fn run(args: NamesArgs) -> Result<()> {
    if !args.output_dir.is_dir() {
        bail!("output directory {} does not exist", args.output_dir.display());
    }

    let catalog: Catalog = read_json(&args.input)?;
    let separators = Regex::new(r"[_\-./]+").context("failed to compile name separator regex")?;
    let names = class_names(&catalog, &separators);

    let path = args.output_dir.join(OUTPUT_FILE);
    write_json_pretty(&path, &names)?;
    info!(path = %path.display(), classes = names.len(), "attribute names written");
    Ok(())
}

pub(crate) fn class_names(catalog: &Catalog, separators: &Regex) -> BTreeMap<ClassId, ClassNames> {
    catalog
        .iter()
        .map(|entity| {
            let entity_camel = camel_name(&entity.name, separators);
            let attributes = entity
                .attributes
                .iter()
                .map(|attribute| {
                    let camel = camel_name(&attribute.name, separators);
                    let final_name = if attribute.index == 0 {
                        camel.clone()
                    } else {
                        format!("{entity_camel}_{camel}")
                    };
                    (
                        attribute.index,
                        AttributeNames {
                            name: attribute.name.clone(),
                            camel_case: camel,
                            final_name,
                            index: attribute.index,
                        },
                    )
                })
                .collect();

            (
                entity.class_id,
                ClassNames {
                    name: entity.name.clone(),
                    filename: source_filename(&entity.name),
                    camel_case: entity_camel,
                    class_id: entity.class_id,
                    attributes,
                },
            )
        })
        .collect()
}

/// `ONU-G` becomes `OnuG`, `Dot1X port extension` becomes `Dot1XPortExtension`.
pub(crate) fn camel_name(name: &str, separators: &Regex) -> String {
    let camel = camel_case(&separators.replace_all(name, " "));
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn source_filename(name: &str) -> String {
    let stem = name
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '/')
        .collect::<String>()
        .to_lowercase();
    format!("{stem}.go")
}
