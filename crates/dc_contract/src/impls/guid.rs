use uuid::Uuid;

use crate::impls::impl_primitive_contract;

impl_primitive_contract!(Uuid, Guid, "uuid::Uuid", "Uuid", Some("uuid"));
