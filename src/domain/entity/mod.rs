pub mod catalog;
pub mod iam;
pub mod order;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait Entity {
    type Id: Copy;

    fn ident(&self) -> Self::Id;
    fn created(&self) -> DateTime<Utc>;
    fn updated(&self) -> Option<DateTime<Utc>>;
}

/// Data used to restore a entity.
///
/// `created` and `updated` are stamped by the persistence boundary on
/// insert and update; entities never mutate them.
#[derive(Debug, Clone)]
pub struct EntityData<I> {
    pub(in crate::domain) id: I,
    pub(in crate::domain) created: DateTime<Utc>,
    pub(in crate::domain) updated: Option<DateTime<Utc>>,
}

impl EntityData<Uuid> {
    /// Identity for a user created now, ahead of its first persistence.
    pub(in crate::domain) fn generate() -> Self {
        Self {
            id: Uuid::new_v4(),
            created: Utc::now(),
            updated: None,
        }
    }
}

macro_rules! impl_entity {
    ($ent:ident, $id:ty, $state:ty) => {
        impl crate::domain::entity::Entity for $ent {
            type Id = $id;

            fn ident(&self) -> $id {
                self.data.id
            }

            fn created(&self) -> chrono::DateTime<chrono::Utc> {
                self.data.created
            }

            fn updated(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.data.updated
            }
        }

        impl $ent {
            pub(in crate::domain) fn restore(
                data: crate::domain::entity::EntityData<$id>,
                state: $state,
            ) -> Self {
                Self { data, state }
            }
        }
    };
}

macro_rules! state_ref {
    ($prop:ident, $rtrn:ty) => {
        pub fn $prop(&self) -> &$rtrn {
            &self.state.$prop
        }
    };
}

macro_rules! state_copy {
    ($prop:ident, $rtrn:ty) => {
        pub fn $prop(&self) -> $rtrn {
            self.state.$prop
        }
    };
}

pub(self) use impl_entity;
pub(self) use state_copy;
pub(self) use state_ref;
