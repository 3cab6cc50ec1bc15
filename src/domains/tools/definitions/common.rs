//! Values shared across catalogue tools.

use crate::domains::tools::schema::FieldSpec;

/// Age bands the catalogue is organised by.
pub const AGE_BANDS: [&str; 4] = ["5-7", "8-11", "12-14", "15-18"];

/// Media topics with published material.
pub const MEDIA_TOPICS: [&str; 3] = ["toe-touch", "stretching", "competition-prep"];

/// Roles a media request can be made for.
pub const ROLES: [&str; 2] = ["cheerleader", "mom"];

/// Field spec for an `age_band` argument.
pub fn age_band_field() -> FieldSpec {
    FieldSpec::string()
        .one_of(AGE_BANDS)
        .describe("Age band of the athlete")
}

/// Field spec for a `user_id` argument.
pub fn user_id_field() -> FieldSpec {
    FieldSpec::string().describe("email or app user id")
}
