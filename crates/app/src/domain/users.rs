//! Users
//!
//! Users are owned by the authentication service; this crate only references them.

use crate::uuids::TypedUuid;

/// User Marker
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
