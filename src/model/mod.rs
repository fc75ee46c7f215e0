pub mod builder;
pub mod data;
pub mod entities;
pub mod enums;
mod references;

pub use builder::*;
pub use data::*;
pub use entities::*;
pub use enums::*;

use std::fmt;

use crate::error::DataResult;

/// Every kind of entity held in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Group,
    Type,
    DogmaAttribute,
    DogmaEffect,
    DogmaType,
    MetaGroup,
    MarketGroup,
    Race,
    Mutaplasmid,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Category => "category",
            EntityKind::Group => "group",
            EntityKind::Type => "type",
            EntityKind::DogmaAttribute => "attribute",
            EntityKind::DogmaEffect => "effect",
            EntityKind::DogmaType => "dogma type",
            EntityKind::MetaGroup => "meta group",
            EntityKind::MarketGroup => "market group",
            EntityKind::Race => "race",
            EntityKind::Mutaplasmid => "mutaplasmid",
        };
        write!(f, "{}", name)
    }
}

/// An entity stored in its own id-keyed table of [`EveData`]
///
/// Identity is `(KIND, id)`; ids of different kinds may collide.
pub trait Entity: Clone + fmt::Debug + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i32;

    /// Name used by the name index, if the kind has one
    fn name(&self) -> Option<&str> {
        None
    }

    fn table(data: &EveData) -> &Table<Self>;

    #[doc(hidden)]
    fn table_mut(data: &mut EveData) -> &mut Table<Self>;

    /// Check that every id this entity refers to resolves in `data`
    fn check_references(&self, data: &EveData) -> DataResult<()>;

    #[doc(hidden)]
    fn link(&self, _relations: &mut Relations) {}

    #[doc(hidden)]
    fn unlink(&self, _relations: &mut Relations) {}
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.categories
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.categories
    }

    fn check_references(&self, _data: &EveData) -> DataResult<()> {
        Ok(())
    }
}

impl Entity for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.groups
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.groups
    }

    fn check_references(&self, data: &EveData) -> DataResult<()> {
        references::check_group(self, data)
    }

    fn link(&self, relations: &mut Relations) {
        relations.link_group(self.category_id, self.id);
    }

    fn unlink(&self, relations: &mut Relations) {
        relations.unlink_group(self.category_id, self.id);
    }
}

impl Entity for Type {
    const KIND: EntityKind = EntityKind::Type;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.types
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.types
    }

    fn check_references(&self, data: &EveData) -> DataResult<()> {
        references::check_type(self, data)
    }

    fn link(&self, relations: &mut Relations) {
        relations.link_type(self.group_id, self.id);
    }

    fn unlink(&self, relations: &mut Relations) {
        relations.unlink_type(self.group_id, self.id);
    }
}

impl Entity for DogmaAttribute {
    const KIND: EntityKind = EntityKind::DogmaAttribute;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.attributes
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.attributes
    }

    fn check_references(&self, _data: &EveData) -> DataResult<()> {
        Ok(())
    }
}

impl Entity for DogmaEffect {
    const KIND: EntityKind = EntityKind::DogmaEffect;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.effects
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.effects
    }

    fn check_references(&self, data: &EveData) -> DataResult<()> {
        references::check_effect(self, data)
    }
}

impl Entity for DogmaType {
    const KIND: EntityKind = EntityKind::DogmaType;

    fn id(&self) -> i32 {
        self.id
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.dogma_types
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.dogma_types
    }

    fn check_references(&self, data: &EveData) -> DataResult<()> {
        references::check_dogma_type(self, data)
    }
}

impl Entity for MetaGroup {
    const KIND: EntityKind = EntityKind::MetaGroup;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.meta_groups
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.meta_groups
    }

    fn check_references(&self, _data: &EveData) -> DataResult<()> {
        Ok(())
    }
}

impl Entity for MarketGroup {
    const KIND: EntityKind = EntityKind::MarketGroup;

    fn id(&self) -> i32 {
        self.id
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.market_groups
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.market_groups
    }

    fn check_references(&self, data: &EveData) -> DataResult<()> {
        references::check_market_group(self, data)
    }
}

impl Entity for Race {
    const KIND: EntityKind = EntityKind::Race;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.races
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.races
    }

    fn check_references(&self, _data: &EveData) -> DataResult<()> {
        Ok(())
    }
}

impl Entity for Mutaplasmid {
    const KIND: EntityKind = EntityKind::Mutaplasmid;

    fn id(&self) -> i32 {
        self.id
    }

    fn table(data: &EveData) -> &Table<Self> {
        &data.mutaplasmids
    }

    fn table_mut(data: &mut EveData) -> &mut Table<Self> {
        &mut data.mutaplasmids
    }

    fn check_references(&self, data: &EveData) -> DataResult<()> {
        references::check_mutaplasmid(self, data)
    }
}
