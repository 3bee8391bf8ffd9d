//! License detection for module source trees.
//!
//! A [`filer::Filer`] exposes the root of a file tree (a module-cache
//! directory or the `HEAD` tree of a git clone). The [`detect::LicenseDetector`]
//! finds license files in it and scores them against embedded license texts,
//! producing a map from SPDX identifier to confidence in `[0, 1]`.

pub mod detect;
pub mod filer;
pub mod normalize;
pub mod templates;
