// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Form body framing.
//!
//! The panel reads its form fields positionally in places, so the body is
//! assembled by hand to keep field order exact: `sess` always comes first.

use crate::session::Session;

/// Content type of every authenticated request body.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Name of the session field.
pub const SESSION_FIELD: &str = "sess";

/// Encodes `fields` in order as `application/x-www-form-urlencoded`.
#[must_use]
pub fn encode<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Encodes `fields` with the session token prepended.
#[must_use]
pub fn encode_authenticated(session: &Session, fields: &[(&str, String)]) -> String {
    encode(
        std::iter::once((SESSION_FIELD, session.as_str()))
            .chain(fields.iter().map(|(name, value)| (*name, value.as_str()))),
    )
}
