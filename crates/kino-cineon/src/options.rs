/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// How the stored code values relate to colour
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorProfile {
    /// Film print when writing, whatever the file says when reading
    #[default]
    Auto,
    /// Code values with no colour meaning attached
    Raw,
    /// Printing density of a film print
    FilmPrint
}

/// Settings a user may change for Cineon input and output
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields, default))]
pub struct CineonOptions {
    pub color_profile: ColorProfile
}

impl ColorProfile {
    /// Whether channel descriptors announce a film print
    pub const fn is_film_print(self) -> bool {
        matches!(self, ColorProfile::Auto | ColorProfile::FilmPrint)
    }
}
