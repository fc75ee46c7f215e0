//! Source files of the JSONL SDE export.

use crate::model::EntityKind;

/// One JSONL file and the entities it yields
#[derive(Debug, Clone, Copy)]
pub struct SourceFile {
    pub file: &'static str,
    pub kind: EntityKind,
    /// A required file must exist; a missing optional one yields no entities
    pub required: bool,
}

impl SourceFile {
    const fn required(file: &'static str, kind: EntityKind) -> Self {
        Self {
            file,
            kind,
            required: true,
        }
    }

    const fn optional(file: &'static str, kind: EntityKind) -> Self {
        Self {
            file,
            kind,
            required: false,
        }
    }
}

/// Every file the loader reads, in load order
pub static SOURCES: &[SourceFile] = &[
    SourceFile::required("categories.jsonl", EntityKind::Category),
    SourceFile::required("groups.jsonl", EntityKind::Group),
    SourceFile::required("types.jsonl", EntityKind::Type),
    SourceFile::required("dogmaAttributes.jsonl", EntityKind::DogmaAttribute),
    SourceFile::required("dogmaEffects.jsonl", EntityKind::DogmaEffect),
    SourceFile::required("typeDogma.jsonl", EntityKind::DogmaType),
    SourceFile::optional("metaGroups.jsonl", EntityKind::MetaGroup),
    SourceFile::optional("marketGroups.jsonl", EntityKind::MarketGroup),
    SourceFile::optional("races.jsonl", EntityKind::Race),
    SourceFile::optional("dynamicItemAttributes.jsonl", EntityKind::Mutaplasmid),
];

/// The source file of an entity kind
pub fn source_for(kind: EntityKind) -> &'static SourceFile {
    SOURCES
        .iter()
        .find(|s| s.kind == kind)
        .unwrap_or_else(|| unreachable!("every entity kind has a source file"))
}
