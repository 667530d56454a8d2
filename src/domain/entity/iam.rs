use uuid::Uuid;

use crate::domain::datatype::security::PasswordHash;

use super::{impl_entity, state_copy, state_ref, EntityData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub(in crate::domain) email: String,
    pub(in crate::domain) password_hash: PasswordHash,
    pub(in crate::domain) first_name: String,
    pub(in crate::domain) last_name: String,
    pub(in crate::domain) is_active: bool,
}

#[derive(Debug, Clone)]
pub struct User {
    pub(in crate::domain) data: EntityData<Uuid>,
    pub(in crate::domain) state: UserState,
}

impl_entity!(User, Uuid, UserState);

impl User {
    state_ref!(email, String);
    state_ref!(password_hash, PasswordHash);
    state_ref!(first_name, String);
    state_ref!(last_name, String);
    state_copy!(is_active, bool);

    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: PasswordHash,
    ) -> Self {
        Self::restore(
            EntityData::generate(),
            UserState {
                email,
                password_hash,
                first_name,
                last_name,
                is_active: true,
            },
        )
    }
}
